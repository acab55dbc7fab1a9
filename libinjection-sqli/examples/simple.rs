use libinjection_sqli::{detect_sqli, SqliFlags, SqliState};

fn main() {
    let inputs = [
        ("SELECT * FROM users WHERE id = 1", "Normal SQL"),
        ("1' OR '1'='1", "Tautology"),
        ("' UNION SELECT * FROM passwords --", "UNION attack"),
        ("1 /*!UNION*/ SELECT 1", "MySQL conditional comment"),
        ("Hello world", "Regular text"),
    ];

    println!("=== SQL Injection Detection ===");
    for (input, description) in &inputs {
        let result = detect_sqli(input.as_bytes());
        let fingerprint = result
            .fingerprint
            .map_or_else(|| "none".to_string(), |fp| fp.to_string());
        println!(
            "{description}: {input} -> {} (fingerprint: {fingerprint})",
            result.is_injection()
        );
    }

    println!("\n=== Folded tokens, single-quote context ===");
    let flags = SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI;
    let mut state = SqliState::new(b"1' AND SLEEP(5)-- x", flags);
    let fingerprint = state.fingerprint(flags);
    println!("fingerprint: {fingerprint}");
    for token in state.tokens() {
        println!(
            "  {} {:?} {:?}",
            token.token_type,
            token.token_type,
            token.value.to_str_lossy()
        );
    }
    println!("{:?}", state.stats());
}
