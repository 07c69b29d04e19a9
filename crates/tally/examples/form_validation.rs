//! Validate a small signup form and print every problem at once.
//!
//! Run with `RUST_LOG=debug` to see each failure as it is recorded.

use std::process;

use log::{error, info};
use thiserror::Error;

use tally::{Aggregator, Failure, TallyError};

#[derive(Debug, Error)]
enum FieldError {
    #[error("required")]
    Required,

    #[error("must contain `{0}`")]
    MissingChar(char),

    #[error("must be between {min} and {max}")]
    OutOfRange { min: u32, max: u32 },
}

struct Signup<'a> {
    username: &'a str,
    email: &'a str,
    age: u32,
    password: &'a str,
    confirm: &'a str,
}

fn required(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    Ok(())
}

fn check_address(email: &str) -> Result<(), TallyError> {
    let mut agg = Aggregator::default();
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));

    agg.run_checked_child("local", || required(local))?;
    agg.run_checked_child("domain", || {
        if domain.contains('.') {
            Ok(())
        } else {
            Err(FieldError::MissingChar('.'))
        }
    })?;
    agg.finish()
}

fn validate(form: &Signup<'_>) -> Result<(), TallyError> {
    let mut agg = Aggregator::default();

    agg.run_checked_child("username", || required(form.username))?;
    agg.run_checked_child("email", || check_address(form.email))?;
    agg.run_checked_child("age", || match form.age {
        13..=120 => Ok(()),
        _ => Err(FieldError::OutOfRange { min: 13, max: 120 }),
    })?;

    if form.password != form.confirm {
        agg.record_own(Failure::msg("passwords do not match"))?;
    }

    agg.finish()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let form = Signup {
        username: "",
        email: "ada@example",
        age: 7,
        password: "hunter2",
        confirm: "hunter3",
    };

    match validate(&form) {
        Ok(()) => info!("Form is valid"),
        Err(err) => {
            error!("{err}");
            if let Some(tree) = err.tree() {
                for (path, failure) in tree.leaves() {
                    let step = if path.is_empty() {
                        "form".to_string()
                    } else {
                        path.join(".")
                    };
                    error!(step = step.as_str(); "{failure}");
                }
            }
            process::exit(1);
        }
    }
}
