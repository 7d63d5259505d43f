//! 通用数据表
//!
//! 对可序列化的行做全文搜索、按列排序、分页，以及 CSV / JSON 导出。
//! 行先序列化为 JSON 对象，搜索与排序都在 JSON 值上进行，返回时仍是原类型。

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

use crate::errors::{Result, TeachAllocError};
use crate::models::PaginationInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(dir: Option<&str>) -> Self {
        match dir.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

pub struct DataTable<T> {
    rows: Vec<(T, Value)>,
}

impl<T: Serialize> DataTable<T> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        let rows = items
            .into_iter()
            .map(|item| {
                let value = serde_json::to_value(&item)?;
                Ok((item, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// 保留任一字段包含搜索词的行，空搜索词不过滤
    pub fn search(mut self, term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            self.rows.retain(|(_, value)| value_matches(value, &needle));
        }
        self
    }

    /// 按列排序，稳定排序，空值始终排在最后
    pub fn sort(mut self, key: Option<&str>, direction: SortDirection) -> Self {
        if let Some(key) = key {
            self.rows.sort_by(|(_, a), (_, b)| {
                compare_values(a.get(key), b.get(key), direction)
            });
        }
        self
    }

    /// 页码从 1 开始
    pub fn page(self, page: i64, limit: i64) -> (Vec<T>, PaginationInfo) {
        let total = self.rows.len() as i64;
        let page = page.max(1);
        let limit = limit.max(1);
        // 页码来自客户端，超出范围时得到空页
        let offset = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let items = self
            .rows
            .into_iter()
            .skip(offset)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(item, _)| item)
            .collect();
        (items, PaginationInfo::new(page, limit, total))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.rows.into_iter().map(|(_, value)| value).collect()
    }
}

fn value_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::String(s) => {
            if s.to_lowercase().contains(needle) {
                return true;
            }
            // 日期字符串同时匹配显示格式
            parse_date_prefix(s)
                .map(|d| d.format("%d/%m/%Y").to_string().contains(needle))
                .unwrap_or(false)
        }
        Value::Array(items) => items.iter().any(|v| value_matches(v, needle)),
        Value::Object(map) => map.values().any(|v| value_matches(v, needle)),
    }
}

fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// 类型感知比较：日期、数字、布尔、不区分大小写的字符串
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => match (parse_date_prefix(x), parse_date_prefix(y)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy).then_with(|| x.cmp(y)),
            _ => x.to_lowercase().cmp(&y.to_lowercase()),
        },
        _ => cell_text(a).to_lowercase().cmp(&cell_text(b).to_lowercase()),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// 导出选项
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub exclude_keys: Vec<String>,
    pub column_order: Option<Vec<String>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            exclude_keys: vec!["id".to_string()],
            column_order: None,
        }
    }
}

impl ExportOptions {
    /// 由逗号分隔的查询参数构建
    pub fn from_params(exclude: Option<&str>, columns: Option<&str>) -> Self {
        let split = |s: &str| -> Vec<String> {
            s.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        };
        let mut options = ExportOptions::default();
        if let Some(exclude) = exclude {
            options.exclude_keys = split(exclude);
        }
        options.column_order = columns.map(split).filter(|c| !c.is_empty());
        options
    }

    /// 表头取第一行的键，去掉排除键；给定列顺序时只保留其中存在的列
    fn columns(&self, first: &Value) -> Vec<String> {
        let keys: Vec<String> = first
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|k| !self.exclude_keys.contains(k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        match &self.column_order {
            Some(order) => order.iter().filter(|k| keys.contains(k)).cloned().collect(),
            None => keys,
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// 导出 CSV，空数据返回 None
pub fn export_csv(rows: &[Value], options: &ExportOptions) -> Result<Option<Vec<u8>>> {
    let Some(first) = rows.first() else {
        warn!("No data to export");
        return Ok(None);
    };
    let columns = options.columns(first);

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);

    wtr.write_record(&columns)
        .map_err(|e| TeachAllocError::serialization(format!("CSV 写入失败: {e}")))?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|key| row.get(key).map(cell_text).unwrap_or_default())
            .collect();
        wtr.write_record(&record)
            .map_err(|e| TeachAllocError::serialization(format!("CSV 写入失败: {e}")))?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| TeachAllocError::serialization(format!("CSV 生成失败: {e}")))?;
    Ok(Some(data))
}

/// 导出 JSON（格式化数组），空数据返回 None
pub fn export_json(rows: &[Value], options: &ExportOptions) -> Result<Option<String>> {
    if rows.is_empty() {
        warn!("No data to export");
        return Ok(None);
    }

    let filtered: Vec<Value> = rows
        .iter()
        .map(|row| match row {
            Value::Object(map) => {
                let mut map = map.clone();
                for key in &options.exclude_keys {
                    map.remove(key);
                }
                Value::Object(map)
            }
            other => other.clone(),
        })
        .collect();

    Ok(Some(serde_json::to_string_pretty(&filtered)?))
}
