use std::env;
use std::fs::{self, File};
use std::process;

use swf_reader::{Swf, Tag};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-swf-file>", args[0]);
        process::exit(1);
    }

    let swf_path = &args[1];
    println!("Reading SWF file: {}", swf_path);
    println!("{}", "=".repeat(60));

    let file = match File::open(swf_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("\nERROR: Failed to open {}", swf_path);
            eprintln!("  {}", e);
            process::exit(1);
        }
    };

    match Swf::parse(file) {
        Ok(parsed) => {
            println!("\nFile Information:");
            println!("  Compression: {:?}", parsed.header.compression);
            println!("  Version: {}", parsed.header.version);
            println!("  Declared length: {} bytes", parsed.header.file_length);
            println!(
                "  Frame size: {}x{} twips",
                parsed.header.frame_size.x_max - parsed.header.frame_size.x_min,
                parsed.header.frame_size.y_max - parsed.header.frame_size.y_min
            );
            println!("  Frame rate: {}", parsed.header.frame_rate);
            println!("  Frame count: {}", parsed.header.frame_count);
            println!("  Decoded tags: {}", parsed.tags.len());

            for tag in &parsed.tags {
                if let Tag::DoAbc(do_abc) = tag {
                    let filename = format!("./{}.abc", do_abc.name);
                    match fs::write(&filename, &do_abc.data) {
                        Ok(()) => {
                            println!("  Wrote {} ({} bytes)", filename, do_abc.data.len());
                        }
                        Err(e) => eprintln!("  ERROR: failed to write {}: {}", filename, e),
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to parse SWF file");
            eprintln!("  {}", e);
            process::exit(1);
        }
    }
}
