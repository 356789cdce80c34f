//! Basic usage example for the nginx-access library.
//!
//! Parses a few `combined` access log lines, shows which ones are rejected,
//! and prints the accepted events in their interchange form.

use nginx_access::{AccessParser, LogParser, Reader, TimeField};
use std::io::Cursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== nginx-access Basic Usage Example ===\n");

    single_line_example()?;
    reader_example()?;
    literal_time_example()?;

    Ok(())
}

/// Example 1: parse one line and inspect the typed fields
fn single_line_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Single Line");
    println!("--------------");

    let parser = AccessParser::new()?;
    let line = r#"203.0.113.5 - jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;

    println!("Log type: {}", parser.log_type());
    println!("Log line: {}", line);
    println!();

    match parser.parse(line) {
        Some(event) => {
            println!("  Remote Address: {:?}", event.remote_addr());
            println!("  Remote User:    {:?}", event.remote_user());
            println!("  Time:           {}", event.time());
            println!("  Request:        {:?}", event.request());
            println!("  Status:         {:?}", event.status());
            println!("  Bytes Sent:     {:?}", event.body_bytes_sent());
            println!("  Referer:        {:?}", event.http_referer());
            println!("  User Agent:     {:?}", event.http_user_agent());
            println!("  JSON:           {}", serde_json::to_string(&event)?);
        }
        None => println!("  Rejected"),
    }

    println!("\n");
    Ok(())
}

/// Example 2: read a whole log and count dropped lines
fn reader_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Reading a Log");
    println!("----------------");

    let log_data = r#"127.0.0.1 - - [08/Nov/2013:13:39:18 +0000] "GET /api/users HTTP/1.1" 200 1024 "-" "curl/7.64.1"
192.168.1.1 - admin [08/Nov/2013:13:40:22 +0000] "POST /api/users HTTP/1.1" 201 256 "https://example.com/" "Mozilla/5.0"
10.0.0.1 frank - [08/Nov/2013:13:41:15 +0000] "GET /api/users/123 HTTP/1.1" 200 512 "-" "curl/7.64.1"
172.16.0.1 - - [08/Nov/2013:13:42:33 +0000] "DELETE /api/users/456 HTTP/1.1" 404 - "-" "curl/7.64.1""#;

    let mut reader = Reader::new(Cursor::new(log_data), AccessParser::new()?);
    let mut total_bytes = 0i64;

    for result in reader.by_ref() {
        let event = result?;
        total_bytes += event.body_bytes_sent().unwrap_or_default();
        println!(
            "  {} {:?} -> {:?}",
            event.time(),
            event.request(),
            event.status()
        );
    }

    println!();
    println!("  Lines:   {}", reader.lines());
    println!("  Dropped: {}", reader.dropped());
    println!("  Bytes:   {}", total_bytes);

    println!("\n");
    Ok(())
}

/// Example 3: strict tokenization of the time column
fn literal_time_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Literal Time Tokenization");
    println!("----------------------------");

    let parser = AccessParser::with_time_field(TimeField::Literal)?;
    let bracketed = r#"203.0.113.5 - - [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;
    let quoted = r#"203.0.113.5 - - "01/Jan/2021:00:00:00 +0000" "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;

    println!("  Bracketed time accepted: {}", parser.parse(bracketed).is_some());
    println!("  Quoted time accepted:    {}", parser.parse(quoted).is_some());

    println!("\n");
    Ok(())
}
