/// Format an integer with thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format elapsed seconds with two decimals
pub fn format_seconds(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a completion percentage for progress lines
pub fn format_percentage(completed: usize, total: usize) -> String {
    if total == 0 {
        return "100.0%".to_string();
    }
    format!("{:.1}%", completed as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(1.0), "1.00");
        assert_eq!(format_seconds(12.346), "12.35");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 3), "33.3%");
        assert_eq!(format_percentage(3, 3), "100.0%");
        assert_eq!(format_percentage(0, 0), "100.0%");
    }
}
