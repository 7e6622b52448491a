//! Parsing of the ref update lines git feeds a `pre-receive` hook.
//!
//! Each line is `<old-id> SP <new-id> SP <ref-name>`. An all-zero old id
//! means the ref is being created, an all-zero new id that it is being
//! deleted.

use std::io::BufRead;

use commit_gate_core::{RefChange, RefChangeType};

use crate::errors::Error;

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;

/// Parse every ref update on `input`, skipping blank lines.
pub fn read_ref_changes(input: impl BufRead) -> Result<Vec<RefChange>, Error> {
    let mut changes = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        changes.push(parse_ref_change(&line)?);
    }
    Ok(changes)
}

pub fn parse_ref_change(line: &str) -> Result<RefChange, Error> {
    let invalid = |reason: &str| Error::InvalidHookInput {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [old, new, ref_id] = fields.as_slice() else {
        return Err(invalid("expected '<old> <new> <ref>'"));
    };

    if !is_object_id(old) || !is_object_id(new) {
        return Err(invalid("object ids must be 40 or 64 hex characters"));
    }

    let change_type = match (is_zero_id(old), is_zero_id(new)) {
        (true, true) => return Err(invalid("old and new ids are both zero")),
        (true, false) => RefChangeType::Add,
        (false, true) => RefChangeType::Delete,
        (false, false) => RefChangeType::Update,
    };

    Ok(RefChange::new(*ref_id, *old, *new, change_type))
}

fn is_object_id(id: &str) -> bool {
    matches!(id.len(), 40 | 64) && id.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_zero_id(id: &str) -> bool {
    id.chars().all(|c| c == '0')
}
