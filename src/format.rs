//! Display helpers for addresses and counters.

/// Sample contract init code, used when no bytecode is supplied.
pub const SAMPLE_BYTECODE: &str = "0x608060405234801561001057600080fd5b506101de806100206000396000f3fe608060405260043610610041576000357c0100000000000000000000000000000000000000000000000000000000900463ffffffff168063a41368621461004657";

/// Shortens an address to `0x1234...abcd`. Strings shorter than 10
/// characters are returned unchanged.
pub fn format_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Compact count with K/M/B suffixes.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
