//! JSON decoding helpers for the social platform API client.

use anyhow::Result;

/// Decode JSON and, on failure, report the serde path to the offending field
/// together with a short snippet of the surrounding line.
///
/// The upstream API occasionally nulls out fields it documents as required;
/// a bare `serde_json` error ("invalid type at line 1 column 48211") is
/// useless against a single-line response body.
pub fn decode_with_path<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(de) {
        Ok(value) => Ok(value),
        Err(err) => {
            let inner = err.inner();
            let (line, column) = (inner.line(), inner.column());
            let path = err.path().to_string();

            // serde_json appends " at line L column C"; strip it since the
            // location is reported separately.
            let msg = inner.to_string();
            let loc = format!(" at line {line} column {column}");
            let msg = msg.strip_suffix(&loc).unwrap_or(&msg).to_string();

            let mut out = String::new();
            if !path.is_empty() && path != "." {
                out.push_str(&format!("at path '{path}': "));
            }
            out.push_str(&format!(
                "{} (line {} col {})\n{}",
                msg,
                line,
                column,
                snippet(body, line, column)
            ));

            Err(anyhow::anyhow!(out))
        }
    }
}

/// A ~20 byte window of the failing line with a caret under the column.
fn snippet(body: &str, line: usize, column: usize) -> String {
    let target = body.lines().nth(line.saturating_sub(1)).unwrap_or("");
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    // column is 1-based and byte-oriented; every offset must sit on a char
    // boundary before slicing or multi-byte text panics mid-character.
    let mut error_idx = column.saturating_sub(1).min(target.len());
    while !target.is_char_boundary(error_idx) {
        error_idx -= 1;
    }
    let mut start = error_idx.saturating_sub(10);
    while !target.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (error_idx + 10).min(target.len());
    while !target.is_char_boundary(end) {
        end += 1;
    }

    let indicator = " ".repeat(target[start..error_idx].chars().count()) + "^";
    format!("...{}...\n   {indicator}", &target[start..end])
}
