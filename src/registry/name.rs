use crate::error::{HaberError, Result};

/// 名前の最大長
const MAX_NAME_LENGTH: usize = 64;

/// コンポーネント名の正規化（前後空白除去・小文字化）と検証
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.trim().to_lowercase();
    validate_name(&normalized).map_err(|reason| HaberError::InvalidComponentName {
        name: name.to_string(),
        reason,
    })?;
    Ok(normalized)
}

/// 名前の検証のみ（正規化済みの名前に対して使用）
fn validate_name(name: &str) -> std::result::Result<(), String> {
    let (Some(first), Some(last)) = (name.chars().next(), name.chars().last()) else {
        return Err("name cannot be empty".to_string());
    };

    if name.len() > MAX_NAME_LENGTH {
        return Err(format!("name is too long (max {} characters)", MAX_NAME_LENGTH));
    }

    // [a-z0-9._-] のみ
    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '.' | '_' | '-'))
    {
        return Err(format!(
            "invalid character '{}'. Only [a-z0-9._-] are allowed",
            c
        ));
    }

    if first == '.' || first == '-' {
        return Err("name cannot start with a period or hyphen".to_string());
    }
    if last == '.' || last == '-' {
        return Err("name cannot end with a period or hyphen".to_string());
    }

    Ok(())
}
