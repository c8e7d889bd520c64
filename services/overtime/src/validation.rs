//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::OvertimeEntry;

/// Validate the owner reference of a record
pub fn validate_user_id(user_id: &str) -> Result<(), String> {
    if user_id.trim().is_empty() {
        return Err("userId is required".to_string());
    }

    if user_id.len() > 64 {
        return Err("userId must be at most 64 characters long".to_string());
    }

    Ok(())
}

/// Validate a calendar year
pub fn validate_year(year: i32) -> Result<(), String> {
    if !(1..=9999).contains(&year) {
        return Err(format!("year must be between 1 and 9999, got {}", year));
    }

    Ok(())
}

/// Validate a calendar month
pub fn validate_month(month: i32) -> Result<(), String> {
    if !(1..=12).contains(&month) {
        return Err(format!("month must be between 1 and 12, got {}", month));
    }

    Ok(())
}

/// Validate a monetary or duration figure
pub fn validate_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", field));
    }

    if value < 0.0 {
        return Err(format!("{} must not be negative", field));
    }

    Ok(())
}

/// Validate a single overtime entry at `index` in its record
pub fn validate_entry(index: usize, entry: &OvertimeEntry) -> Result<(), String> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let date_regex = DATE_REGEX
        .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to compile date regex"));

    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let time_regex = TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Failed to compile time regex")
    });

    if !date_regex.is_match(&entry.date) {
        return Err(format!("entries[{}].date must use the YYYY-MM-DD format", index));
    }

    if !time_regex.is_match(&entry.start_time) {
        return Err(format!("entries[{}].startTime must use the HH:MM format", index));
    }

    if !time_regex.is_match(&entry.end_time) {
        return Err(format!("entries[{}].endTime must use the HH:MM format", index));
    }

    validate_amount(
        &format!("entries[{}].overtimeHours", index),
        entry.overtime_hours,
    )?;
    validate_amount(
        &format!("entries[{}].overtimePay", index),
        entry.overtime_pay,
    )?;

    Ok(())
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}
