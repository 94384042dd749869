use crate::constants::DEFAULT_RENDER_DPI;
use crate::operations::Operation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "mydocs",
    about = "Batch-convert images and PDFs, and compress JPEGs under a target size",
    long_about = "mydocs converts images (JPEG, PNG, WebP, BMP, TIFF) and PDF documents between formats \
                  and compresses JPEGs below fixed size ceilings. Every result lands in a single output \
                  folder next to a copy of the original; existing outputs are never overwritten, so \
                  re-running a batch only fills in what is missing.",
    version,
    after_help = "EXAMPLES:\n  \
    mydocs run photo.png --op A4\n  \
    mydocs run ./scans --op convert-all --op compress-all -s\n  \
    mydocs run \"./photos/*.jpg\" --all --output-root ./out\n  \
    mydocs menu"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Trace every encode attempt")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Run selected operations over files",
        long_about = "Run the selected conversion and compression operations over every input, \
                      one file at a time, in the order the operations were given."
    )]
    Run {
        #[arg(
            required = true,
            help = "Input files, directories or glob patterns",
            long_help = "Files are processed as given. Directories and glob patterns are \
                         filtered to jpg, jpeg, png, webp, bmp, tiff and pdf."
        )]
        inputs: Vec<String>,

        #[arg(
            short = 'o',
            long = "op",
            value_parser = parse_operation,
            help = "Operation code or name (repeatable), see `mydocs menu`"
        )]
        operations: Vec<Operation>,

        #[arg(
            short = 'a',
            long,
            help = "Compress and convert all (A1 + B1)",
            conflicts_with = "operations"
        )]
        all: bool,

        #[arg(
            short = 's',
            long,
            help = "Make separate folders per output format"
        )]
        separate_folders: bool,

        #[arg(
            long,
            help = "Output root (default: myDocs next to the executable)"
        )]
        output_root: Option<PathBuf>,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively"
        )]
        recursive: bool,

        #[arg(
            long,
            help = "Losslessly optimize PNG output with oxipng"
        )]
        optimize_png: bool,

        #[arg(
            long,
            default_value_t = DEFAULT_RENDER_DPI,
            help = "Resolution used when rasterizing PDF pages"
        )]
        dpi: f32,
    },

    #[command(about = "Print the operation menu")]
    Menu,
}

pub fn parse_operation(value: &str) -> Result<Operation, String> {
    Operation::from_str(value).map_err(|e| e.to_string())
}
