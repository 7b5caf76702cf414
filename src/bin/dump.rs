//! Prints a file line by line, reading it eight bytes at a time.

use anyhow::Context;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const READ_SIZE: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "messages.txt".to_string());
    let mut file = File::open(&path)
        .await
        .with_context(|| format!("opening {}", path))?;

    let mut buf = [0u8; READ_SIZE];
    let mut pending = Vec::new();
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        for line in complete_lines(&mut pending, &buf[..n]) {
            print_line(&line);
        }
    }
    print_line(&pending);

    Ok(())
}

/// Appends `data` to `pending` and splits off every line it completes.
///
/// The newline is dropped; whatever follows the last newline stays in
/// `pending` for the next read.
fn complete_lines(pending: &mut Vec<u8>, data: &[u8]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    for &byte in data {
        if byte == b'\n' {
            lines.push(std::mem::take(pending));
        } else {
            pending.push(byte);
        }
    }
    lines
}

fn print_line(line: &[u8]) {
    if !line.is_empty() {
        println!("read: {}", String::from_utf8_lossy(line));
    }
}
