//! Operator commands for the fields no HTTP route may change.
//!
//! Usage:
//!   rosterforge                                  run the server
//!   rosterforge grant-admin <email>
//!   rosterforge revoke-admin <email>
//!   rosterforge set-plan <email> free
//!   rosterforge set-plan <email> premium [<expiry RFC 3339>]
//!
//! Expiries must carry a time and an offset; they are stored normalized to UTC.
//! Admin changes reach a user's token at their next login.

use anyhow::Context;
use tracing::info;

use crate::auth::repo_types::{Plan, User};
use crate::db::{format_timestamp, Db};
use crate::entitlement::parse_instant;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Serve,
    SetAdmin { email: String, is_admin: bool },
    SetPlan {
        email: String,
        plan: Plan,
        expiry: Option<String>,
    },
}

pub fn parse(args: &[String]) -> anyhow::Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["serve"] => Ok(Command::Serve),
        ["grant-admin", email] => Ok(Command::SetAdmin {
            email: email.to_string(),
            is_admin: true,
        }),
        ["revoke-admin", email] => Ok(Command::SetAdmin {
            email: email.to_string(),
            is_admin: false,
        }),
        ["set-plan", email, plan, rest @ ..] if rest.len() <= 1 => {
            let plan: Plan = plan.parse()?;
            let expiry = rest.first().map(|raw| normalize_expiry(raw)).transpose()?;
            anyhow::ensure!(
                plan == Plan::Premium || expiry.is_none(),
                "an expiry only applies to the premium plan"
            );
            Ok(Command::SetPlan {
                email: email.to_string(),
                plan,
                expiry,
            })
        }
        other => anyhow::bail!("unrecognized command: {}", other.join(" ")),
    }
}

fn normalize_expiry(raw: &str) -> anyhow::Result<String> {
    let at = parse_instant(raw)
        .with_context(|| format!("expiry {raw:?} is not an RFC 3339 date-time with offset"))?;
    Ok(format_timestamp(at)?)
}

pub async fn run(command: Command, db: &Db) -> anyhow::Result<()> {
    match command {
        Command::Serve => Ok(()),
        Command::SetAdmin { email, is_admin } => {
            let found = User::set_admin(db.pool(), &email, is_admin)
                .await
                .context("update admin flag")?;
            anyhow::ensure!(found, "no user with email {email}");
            info!(%email, is_admin, "admin flag updated");
            Ok(())
        }
        Command::SetPlan {
            email,
            plan,
            expiry,
        } => {
            let found = User::set_plan(db.pool(), &email, plan, expiry.as_deref())
                .await
                .context("update plan")?;
            anyhow::ensure!(found, "no user with email {email}");
            info!(%email, ?plan, ?expiry, "plan updated");
            Ok(())
        }
    }
}
