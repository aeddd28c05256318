use std::io::Read;

use refsched::Extractor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let extractor = Extractor::new();
    println!("Detected format: {}", extractor.classify(&text));

    match extractor.try_extract(&text) {
        Ok(drafts) => println!("{}", serde_json::to_string_pretty(&drafts)?),
        Err(e) => eprintln!("No matches could be extracted: {e}"),
    }
    Ok(())
}
