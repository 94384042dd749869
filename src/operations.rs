//! Operation catalog
//!
//! The externally visible menu is a closed set of twelve operations: seven
//! conversions (A1-A7) and five compressions (B1-B5).

use crate::error::{ConvertError, Result};
use crate::formats::{OutputFormat, Target};
use std::fmt;
use std::str::FromStr;

/// Byte ceiling a compression request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Kb250,
    Kb500,
    Mb1,
    Mb5,
}

impl SizeClass {
    /// Largest threshold first, the order used by "compress to all sizes"
    pub const LARGEST_FIRST: [SizeClass; 4] = [
        SizeClass::Mb5,
        SizeClass::Mb1,
        SizeClass::Kb500,
        SizeClass::Kb250,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Kb250 => "250 KB",
            SizeClass::Kb500 => "500 KB",
            SizeClass::Mb1 => "1 MB",
            SizeClass::Mb5 => "5 MB",
        }
    }

    pub fn max_bytes(&self) -> u64 {
        match self {
            SizeClass::Kb250 => 250 * 1024,
            SizeClass::Kb500 => 500 * 1024,
            SizeClass::Mb1 => 1024 * 1024,
            SizeClass::Mb5 => 5 * 1024 * 1024,
        }
    }

    /// Label with spaces stripped, embedded in output file names
    pub fn suffix(&self) -> String {
        self.label().replace(' ', "")
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Image to every other format plus PDF; PDF to JPEG pages
    ConvertAll,
    Convert(Target),
    CompressAll,
    Compress(SizeClass),
}

impl Operation {
    /// Menu order
    pub const CATALOG: [Operation; 12] = [
        Operation::ConvertAll,
        Operation::Convert(Target::Pdf),
        Operation::Convert(Target::Image(OutputFormat::Png)),
        Operation::Convert(Target::Image(OutputFormat::Jpeg)),
        Operation::Convert(Target::Image(OutputFormat::WebP)),
        Operation::Convert(Target::Image(OutputFormat::Bmp)),
        Operation::Convert(Target::Image(OutputFormat::Tiff)),
        Operation::CompressAll,
        Operation::Compress(SizeClass::Kb250),
        Operation::Compress(SizeClass::Kb500),
        Operation::Compress(SizeClass::Mb1),
        Operation::Compress(SizeClass::Mb5),
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Operation::ConvertAll => "A1",
            Operation::Convert(Target::Pdf) => "A2",
            Operation::Convert(Target::Image(OutputFormat::Png)) => "A3",
            Operation::Convert(Target::Image(OutputFormat::Jpeg)) => "A4",
            Operation::Convert(Target::Image(OutputFormat::WebP)) => "A5",
            Operation::Convert(Target::Image(OutputFormat::Bmp)) => "A6",
            Operation::Convert(Target::Image(OutputFormat::Tiff)) => "A7",
            Operation::CompressAll => "B1",
            Operation::Compress(SizeClass::Kb250) => "B2",
            Operation::Compress(SizeClass::Kb500) => "B3",
            Operation::Compress(SizeClass::Mb1) => "B4",
            Operation::Compress(SizeClass::Mb5) => "B5",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Operation::ConvertAll => "convert-all",
            Operation::Convert(Target::Pdf) => "to-pdf",
            Operation::Convert(Target::Image(OutputFormat::Png)) => "to-png",
            Operation::Convert(Target::Image(OutputFormat::Jpeg)) => "to-jpeg",
            Operation::Convert(Target::Image(OutputFormat::WebP)) => "to-webp",
            Operation::Convert(Target::Image(OutputFormat::Bmp)) => "to-bmp",
            Operation::Convert(Target::Image(OutputFormat::Tiff)) => "to-tiff",
            Operation::CompressAll => "compress-all",
            Operation::Compress(SizeClass::Kb250) => "compress-250kb",
            Operation::Compress(SizeClass::Kb500) => "compress-500kb",
            Operation::Compress(SizeClass::Mb1) => "compress-1mb",
            Operation::Compress(SizeClass::Mb5) => "compress-5mb",
        }
    }

    /// Menu entry, verbatim
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ConvertAll => "A1: Convert All (Image to all types, PDF to JPEG)",
            Operation::Convert(Target::Pdf) => "A2: Convert Image/PDF to PDF",
            Operation::Convert(Target::Image(OutputFormat::Png)) => "A3: Convert Image/PDF to PNG",
            Operation::Convert(Target::Image(OutputFormat::Jpeg)) => {
                "A4: Convert Image/PDF to JPG/JPEG"
            }
            Operation::Convert(Target::Image(OutputFormat::WebP)) => {
                "A5: Convert Image/PDF to WebP"
            }
            Operation::Convert(Target::Image(OutputFormat::Bmp)) => "A6: Convert Image/PDF to BMP",
            Operation::Convert(Target::Image(OutputFormat::Tiff)) => {
                "A7: Convert Image/PDF to TIFF"
            }
            Operation::CompressAll => "B1: Compress to All Target Sizes (250kb, 500kb, 1MB, 5MB)",
            Operation::Compress(SizeClass::Kb250) => "B2: Compress to < 250 KB",
            Operation::Compress(SizeClass::Kb500) => "B3: Compress to < 500 KB",
            Operation::Compress(SizeClass::Mb1) => "B4: Compress to < 1 MB",
            Operation::Compress(SizeClass::Mb5) => "B5: Compress to < 5 MB",
        }
    }

    /// The "Compress and Convert All" selection
    pub fn master_selection() -> Vec<Operation> {
        vec![Operation::ConvertAll, Operation::CompressAll]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operation {
    type Err = ConvertError;

    /// Accepts a menu code (`A4`) or a slug (`to-jpeg`), case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Operation::CATALOG
            .into_iter()
            .find(|op| op.code().eq_ignore_ascii_case(wanted) || op.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConvertError::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_size_class_thresholds() {
        assert_eq!(SizeClass::Kb250.max_bytes(), 256_000);
        assert_eq!(SizeClass::Kb500.max_bytes(), 512_000);
        assert_eq!(SizeClass::Mb1.max_bytes(), 1_048_576);
        assert_eq!(SizeClass::Mb5.max_bytes(), 5_242_880);
    }

    #[test]
    fn test_size_class_suffix() {
        assert_eq!(SizeClass::Kb250.suffix(), "250KB");
        assert_eq!(SizeClass::Mb1.suffix(), "1MB");
    }

    #[test]
    fn test_largest_first_is_descending() {
        let sizes: Vec<u64> = SizeClass::LARGEST_FIRST.iter().map(|c| c.max_bytes()).collect();
        let mut sorted = sizes.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(sizes, sorted);
    }

    #[test]
    fn test_catalog_codes_are_unique_and_ordered() {
        let codes: Vec<&str> = Operation::CATALOG.iter().map(|op| op.code()).collect();
        assert_eq!(
            codes,
            vec!["A1", "A2", "A3", "A4", "A5", "A6", "A7", "B1", "B2", "B3", "B4", "B5"]
        );
        let slugs: HashSet<&str> = Operation::CATALOG.iter().map(|op| op.slug()).collect();
        assert_eq!(slugs.len(), 12);
    }

    #[test]
    fn test_labels_start_with_code() {
        for op in Operation::CATALOG {
            assert!(op.label().starts_with(&format!("{}: ", op.code())));
        }
    }

    #[test]
    fn test_operation_from_str() {
        assert_eq!(
            Operation::from_str("a4").unwrap(),
            Operation::Convert(Target::Image(OutputFormat::Jpeg))
        );
        assert_eq!(Operation::from_str("B1").unwrap(), Operation::CompressAll);
        assert_eq!(
            Operation::from_str("compress-500KB").unwrap(),
            Operation::Compress(SizeClass::Kb500)
        );
        assert_eq!(Operation::from_str("to-pdf").unwrap(), Operation::Convert(Target::Pdf));
        assert!(matches!(
            Operation::from_str("C9"),
            Err(ConvertError::UnknownOperation(_))
        ));
    }
}
