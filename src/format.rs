// ======================================================
// HUMAN-READABLE VALUES
// ======================================================

const BYTE_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Render a byte count in binary units, e.g. 134217728 -> "128MiB".
/// Four significant digits, trailing zeros trimmed.
pub fn human_size(bytes: i64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size.abs() >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{}{}", significant(size), BYTE_UNITS[unit])
}

fn significant(value: f64) -> String {
    let decimals = if value.abs() >= 1000.0 {
        0
    } else if value.abs() >= 100.0 {
        1
    } else if value.abs() >= 10.0 {
        2
    } else {
        3
    };

    let rendered = format!("{:.*}", decimals, value);

    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

/// Render a ulimit the way the docker CLI accepts it: "name=soft:hard".
pub fn ulimit(name: &str, soft: i64, hard: i64) -> String {
    format!("{}={}:{}", name, soft, hard)
}
