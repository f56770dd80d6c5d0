/// Initializes `tracing-subscriber` for the demo binary.
///
/// Verbosity comes from `RUST_LOG`:
///
/// ```bash
/// # Commits and rejected transactions
/// RUST_LOG=info cargo run
///
/// # Every ledger request, proposal arguments and entity payloads
/// RUST_LOG=debug cargo run
/// ```
///
/// Module paths are hidden; registry logs carry an `entity_type` field and contract
/// logs a `contract` field instead.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
