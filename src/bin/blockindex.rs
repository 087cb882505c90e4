//! Command-line interface for blockindex.
//!
//! Every diagnostic goes to stderr; results go to stdout. The process
//! reports success or failure through console text only.

use std::env;

use blockindex::{ops, Result};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: blockindex <command> <args>");
    eprintln!();
    eprintln!("COMMANDS:");
    eprintln!("    create  <file>                 Create a new index file");
    eprintln!("    insert  <file> <key> <value>   Insert one key/value pair");
    eprintln!("    search  <file> <key>           Look up a key");
    eprintln!("    load    <file> <csv>           Bulk-load key,value records");
    eprintln!("    print   <file>                 Print all pairs in key order");
    eprintln!("    extract <file> <out.csv>       Write all pairs to a new CSV file");
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[0].as_str() {
        "create" => cmd_create(&args[1..]),
        "insert" => cmd_insert(&args[1..]),
        "search" => cmd_search(&args[1..]),
        "load" => cmd_load(&args[1..]),
        "print" => cmd_print(&args[1..]),
        "extract" => cmd_extract(&args[1..]),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
}

fn cmd_create(args: &[String]) -> Result<()> {
    ops::create(&args[0])?;
    println!("Index file created.");
    Ok(())
}

fn cmd_insert(args: &[String]) -> Result<()> {
    let (Some(key), Some(value)) = (parse_int(args.get(1)), parse_int(args.get(2))) else {
        eprintln!("Usage: blockindex insert <file> <key> <value>");
        return Ok(());
    };
    ops::insert(&args[0], key, value)
}

fn cmd_search(args: &[String]) -> Result<()> {
    let Some(key) = parse_int(args.get(1)) else {
        eprintln!("Usage: blockindex search <file> <key>");
        return Ok(());
    };
    match ops::search(&args[0], key)? {
        Some(value) => println!("{key} => {value}"),
        None => eprintln!("Key not found."),
    }
    Ok(())
}

fn cmd_load(args: &[String]) -> Result<()> {
    let Some(csv_path) = args.get(1) else {
        eprintln!("Usage: blockindex load <file> <csv>");
        return Ok(());
    };
    let (inserted, skipped) = ops::load(&args[0], csv_path)?;
    println!("Loaded {inserted} records ({skipped} skipped).");
    Ok(())
}

fn cmd_print(args: &[String]) -> Result<()> {
    for (key, value) in ops::get_all(&args[0])? {
        println!("{key} => {value}");
    }
    Ok(())
}

fn cmd_extract(args: &[String]) -> Result<()> {
    let Some(out_path) = args.get(1) else {
        eprintln!("Usage: blockindex extract <file> <out.csv>");
        return Ok(());
    };
    let count = ops::extract(&args[0], out_path)?;
    println!("Extracted {count} records.");
    Ok(())
}

fn parse_int(arg: Option<&String>) -> Option<i64> {
    arg.and_then(|s| s.parse().ok())
}
