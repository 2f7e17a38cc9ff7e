// crates/ebd_config/src/error.rs

//! 配置层错误类型

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },
}

impl ConfigError {
    /// 构造无效值错误
    pub fn invalid(key: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("rotating_frame.axis", 4, "必须小于 3");
        assert!(err.to_string().contains("rotating_frame.axis"));
        assert!(err.to_string().contains('4'));
    }
}
