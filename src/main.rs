use metop_reader::MetopReader;
use std::env;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-product-file> [--dump-headers]", args[0]);
        std::process::exit(1);
    }

    let product_path = &args[1];
    let dump_headers = args.iter().any(|arg| arg == "--dump-headers");

    println!("Reading METOP product: {}", product_path);
    println!("{}", "=".repeat(60));

    match MetopReader::open(product_path) {
        Ok(reader) => {
            let layout = reader.layout();

            println!("\nProduct Information:");
            println!("  Name: {}", reader.product_name().unwrap_or("<unknown>"));
            println!(
                "  Size: {} x {} pixels",
                layout.product_width, layout.product_height
            );
            println!(
                "  Data records: {} bytes each, first at offset {}",
                layout.mdr_size, layout.first_mdr_offset
            );
            println!(
                "  Navigation: {} points every {} scanlines",
                layout.nav_points, layout.nav_sample_rate
            );
            println!("  Channel 3 mode: {:?}", reader.channel_mode());

            let start = reader.start_time();
            println!(
                "  Sensing start: day {} + {}.{:03}s",
                start.day, start.seconds, start.millis
            );

            if dump_headers {
                println!("\nMain Product Header:");
                println!("{}", reader.mphr().dump());
                println!("\nSecondary Product Header:");
                println!("{}", reader.sphr().dump());
            }
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to read METOP product");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
