//! Issues a scoped operator API token for the gateway.
//!
//! ```bash
//! JWT_SECRET=... gen-token <operator-account-id> <operator-code> [scope...]
//! ```
//!
//! Scopes default to `launch reports` when none are given. Reads
//! `JWT_SECRET` and optionally `JWT_EXPIRATION_HOURS` from the environment,
//! like the server does.

use lib_auth::{issue_operator_token, SCOPE_LAUNCH, SCOPE_REPORTS};
use lib_utils::envs::{get_env, get_env_parse_or};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: gen-token <operator-account-id> <operator-code> [scope...]");
        std::process::exit(2);
    }
    let (account_id, operator) = (args[0].as_str(), args[1].as_str());

    let scopes: Vec<&str> = if args.len() > 2 {
        args[2..].iter().map(|s| s.as_str()).collect()
    } else {
        vec![SCOPE_LAUNCH, SCOPE_REPORTS]
    };

    let secret = get_env("JWT_SECRET")?;
    let expiration_hours = get_env_parse_or("JWT_EXPIRATION_HOURS", 24)?;

    let token = issue_operator_token(account_id, operator, &scopes, &secret, expiration_hours)
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{token}");

    Ok(())
}
