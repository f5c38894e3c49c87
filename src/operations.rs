//! The five things a user can ask the table service to do.
//!
//! Each operation reads its own input, sends exactly one request and prints
//! the outcome. Failures end the operation, never the session; the only
//! errors returned are from reading input, plus a sign-up or login answered
//! with 200 but no token.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::StatusCode;

use crate::client::decode::{decode_rows, DecodeError};
use crate::client::{
    ApiError, Credentials, Filter, InsertRequest, QueryRequest, RawResponse, TableApi,
    TokenResponse,
};
use crate::prompts::{confirm, Prompter};
use crate::value::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    SignUp,
    Login,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKind::SignUp => f.write_str("Sign-up"),
            AuthKind::Login => f.write_str("Login"),
        }
    }
}

/// How an insert, select or delete ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Insert answered 201, or delete answered 204.
    Done,
    /// Select printed this many rows.
    Rows(usize),
    NoResults,
    /// The server answered with an error status.
    Rejected(StatusCode),
    /// Delete answered with a status that is neither 204 nor an error.
    Unexpected(StatusCode),
    /// Select got a success status with a body that is not JSON.
    InvalidResponse,
    NetworkError,
    /// Nothing was sent.
    InvalidInput,
}

fn report_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn report_failure(message: &str, response: &RawResponse) {
    println!("{} {} {} {}", "✗".red(), message, response.status, response.body);
}

fn report_network_error(err: &ApiError) {
    println!("{} {}", "Network error:".red(), err);
}

fn report_input_error(message: &str) {
    println!("{} {}", "✗".red(), message);
}

/// Register a new account. Returns the token on success.
pub async fn sign_up(prompter: &mut impl Prompter, api: &impl TableApi) -> Result<Option<String>> {
    authenticate(prompter, api, AuthKind::SignUp).await
}

/// Log in to an existing account. Returns the token on success.
pub async fn login(prompter: &mut impl Prompter, api: &impl TableApi) -> Result<Option<String>> {
    authenticate(prompter, api, AuthKind::Login).await
}

async fn authenticate(
    prompter: &mut impl Prompter,
    api: &impl TableApi,
    kind: AuthKind,
) -> Result<Option<String>> {
    let email = prompter.text("Enter your email:")?;
    let password = prompter.password("Enter your password:")?;
    let credentials = Credentials::new(email, password);

    let sent = match kind {
        AuthKind::SignUp => api.sign_up(&credentials).await,
        AuthKind::Login => api.login(&credentials).await,
    };
    let response = match sent {
        Ok(response) => response,
        Err(err) => {
            report_network_error(&err);
            return Ok(None);
        }
    };

    if response.status != StatusCode::OK {
        report_failure(&format!("{} failed:", kind), &response);
        return Ok(None);
    }

    let TokenResponse { token } = TokenResponse::from_body(&response.body)
        .with_context(|| format!("{} answered 200 without a usable token", kind))?;

    if token.is_empty() {
        report_input_error(&format!("{} returned an empty token", kind));
        return Ok(None);
    }

    report_success(&format!("{} successful!", kind));
    println!("Token kept for this session.");
    Ok(Some(token))
}

/// Read a table name, rejecting an empty one.
fn prompt_table(prompter: &mut impl Prompter) -> Result<Option<String>> {
    let table = prompter.text("Enter table name:")?;
    if table.trim().is_empty() {
        report_input_error("Table name cannot be empty");
        return Ok(None);
    }
    Ok(Some(table))
}

/// Read a table name and, if asked for, one `where` condition.
fn prompt_query(prompter: &mut impl Prompter) -> Result<Option<QueryRequest>> {
    let Some(table) = prompt_table(prompter)? else {
        return Ok(None);
    };

    let filter = if confirm(prompter, "Use 'Where'? (y/n):")? {
        let field = prompter.text("Enter field:")?;
        let op = prompter.text("Enter operator ('=', '!=', '<', '>'):")?;
        let value = prompter.text("Enter value:")?;
        Some(Filter {
            field,
            op,
            value: FieldValue::coerce(&value),
        })
    } else {
        None
    };

    Ok(Some(QueryRequest::new(table, filter)))
}

/// Insert one row built from user-typed field/value pairs.
///
/// A negative field count sends an empty row.
pub async fn insert(
    prompter: &mut impl Prompter,
    api: &impl TableApi,
    token: &str,
) -> Result<Outcome> {
    let Some(table) = prompt_table(prompter)? else {
        return Ok(Outcome::InvalidInput);
    };

    let count = prompter.text("Enter number of fields:")?;
    let Ok(count) = count.trim().parse::<i64>() else {
        report_input_error("Invalid input");
        return Ok(Outcome::InvalidInput);
    };

    let mut values = BTreeMap::new();
    for i in 1..=count {
        let key = prompter.text(&format!("Field {} name:", i))?;
        let value = prompter.text(&format!("Field {} value:", i))?;
        values.insert(key, FieldValue::coerce(&value));
    }

    let request = InsertRequest { table, values };
    let response = match api.insert(token, &request).await {
        Ok(response) => response,
        Err(err) => {
            report_network_error(&err);
            return Ok(Outcome::NetworkError);
        }
    };

    if response.status != StatusCode::CREATED {
        report_failure("Failed to create:", &response);
        return Ok(Outcome::Rejected(response.status));
    }

    report_success("Created successfully");
    Ok(Outcome::Done)
}

/// Fetch rows and print them in the order the server sent them.
pub async fn select(
    prompter: &mut impl Prompter,
    api: &impl TableApi,
    token: &str,
) -> Result<Outcome> {
    let Some(query) = prompt_query(prompter)? else {
        return Ok(Outcome::InvalidInput);
    };

    let response = match api.select(token, &query).await {
        Ok(response) => response,
        Err(err) => {
            report_network_error(&err);
            return Ok(Outcome::NetworkError);
        }
    };

    let rows = match decode_rows(&response) {
        Ok(rows) => rows,
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            return Ok(match err {
                DecodeError::Http { status, .. } => Outcome::Rejected(status),
                DecodeError::InvalidJson(_) => Outcome::InvalidResponse,
            });
        }
    };

    if rows.is_empty() {
        println!("No results.");
        return Ok(Outcome::NoResults);
    }

    for row in &rows {
        println!(
            "{}",
            serde_json::to_string_pretty(row).context("Failed to format row")?
        );
    }
    Ok(Outcome::Rows(rows.len()))
}

/// Delete the rows matching the query.
pub async fn delete(
    prompter: &mut impl Prompter,
    api: &impl TableApi,
    token: &str,
) -> Result<Outcome> {
    let Some(query) = prompt_query(prompter)? else {
        return Ok(Outcome::InvalidInput);
    };

    let response = match api.delete(token, &query).await {
        Ok(response) => response,
        Err(err) => {
            report_network_error(&err);
            return Ok(Outcome::NetworkError);
        }
    };

    if response.status == StatusCode::NO_CONTENT {
        report_success("Deleted successfully.");
        Ok(Outcome::Done)
    } else if response.status.as_u16() >= 400 {
        report_failure("Delete failed:", &response);
        Ok(Outcome::Rejected(response.status))
    } else {
        println!("{} {}", "Unexpected response:".yellow(), response.status);
        Ok(Outcome::Unexpected(response.status))
    }
}
