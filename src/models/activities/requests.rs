use serde::Deserialize;

// 课次列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OccurrenceQuery {
    /// 仅返回今天及以后的课次，接受 `1` / `true`
    #[serde(default)]
    pub future_only: Option<String>,
}

impl OccurrenceQuery {
    pub fn future_only(&self) -> bool {
        matches!(self.future_only.as_deref(), Some("1") | Some("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_only_flag_values() {
        let q = |v: Option<&str>| OccurrenceQuery {
            future_only: v.map(str::to_string),
        };
        assert!(q(Some("1")).future_only());
        assert!(q(Some("true")).future_only());
        assert!(!q(Some("0")).future_only());
        assert!(!q(None).future_only());
    }
}
