//! Front matter 提取：文档开头的 `---` 分隔块，内容为 JSON 对象或 YAML 映射。

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A-{3,}[ \t]*\r?\n(?:(.*?)\r?\n)?-{3,}[ \t]*(?:\r?\n|\z)")
        .expect("front matter pattern is valid")
});

/// 解析后的 front matter 字段表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Map<String, Value>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// 从原始文本中提取 front matter。
///
/// 没有 front matter 时返回空表；有开头分隔行却没有结束分隔行、
/// 或内容不是合法 JSON/YAML 时返回错误。
pub fn extract(raw: &str, path: &Path) -> Result<FrontMatter> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(caps) = BLOCK_RE.captures(text) else {
        if opens_block(text) {
            return Err(Error::UnterminatedFrontMatter {
                path: path.to_path_buf(),
            });
        }
        return Ok(FrontMatter::default());
    };

    let body = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    if body.is_empty() {
        return Ok(FrontMatter::default());
    }

    let fields = if body.starts_with('{') {
        parse_json(body, path)?
    } else {
        parse_yaml(body, path)?
    };
    Ok(FrontMatter { fields })
}

fn opens_block(text: &str) -> bool {
    let first = text.lines().next().unwrap_or("").trim_end();
    first.len() >= 3 && first.chars().all(|c| c == '-')
}

fn parse_json(body: &str, path: &Path) -> Result<Map<String, Value>> {
    let malformed = |detail: String| Error::MalformedJson {
        path: path.to_path_buf(),
        detail,
    };

    if !body.ends_with('}') {
        return Err(malformed("object is not closed by `}`".into()));
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(malformed("expected an object".into())),
        Err(e) => Err(malformed(e.to_string())),
    }
}

fn parse_yaml(body: &str, path: &Path) -> Result<Map<String, Value>> {
    let malformed = |detail: String| Error::MalformedYaml {
        path: path.to_path_buf(),
        detail,
    };

    let value: serde_yaml::Value =
        serde_yaml::from_str(body).map_err(|e| malformed(e.to_string()))?;

    match value {
        serde_yaml::Value::Null => Ok(Map::new()),
        serde_yaml::Value::Mapping(_) => match yaml_to_json(value).map_err(malformed)? {
            Value::Object(map) => Ok(map),
            _ => Err(malformed("expected a mapping".into())),
        },
        _ => Err(malformed("expected a mapping".into())),
    }
}

// 只接受 core schema：标量、序列、映射；任何自定义 tag 都拒绝
fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Y;

    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("non-finite number {f}"))?
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Y::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(yaml_key(k)?, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        Y::Tagged(tagged) => return Err(format!("custom tag {} is not allowed", tagged.tag)),
    })
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => Ok(s),
        Y::Number(n) => Ok(n.to_string()),
        Y::Bool(b) => Ok(b.to_string()),
        Y::Null => Ok("null".into()),
        other => Err(format!("unsupported mapping key {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("/blog/source/_posts/hello.md")
    }

    #[test]
    fn no_front_matter_is_empty() {
        let fm = extract("# Title\n\nbody text\n", path()).unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn yaml_block() {
        let raw = "---\ntitle: Hello\ndate: 2021-05-01 10:00:00\ntags: [a, b]\n---\n# Body\n";
        let fm = extract(raw, path()).unwrap();
        assert_eq!(fm.get("title"), Some(&Value::from("Hello")));
        assert_eq!(fm.get("date"), Some(&Value::from("2021-05-01 10:00:00")));
        assert_eq!(fm.get("tags"), Some(&serde_json::json!(["a", "b"])));
    }

    #[test]
    fn json_block() {
        let raw = "---\n{\"title\": \"Hello\", \"updated\": \"2021-06-01T00:00:00Z\"}\n---\nbody";
        let fm = extract(raw, path()).unwrap();
        assert_eq!(fm.get("updated"), Some(&Value::from("2021-06-01T00:00:00Z")));
    }

    #[test]
    fn json_and_yaml_agree_on_date() {
        let json = extract("---\n{\"date\":\"2021-01-01T00:00:00Z\"}\n---\n", path()).unwrap();
        let yaml = extract("---\ndate: 2021-01-01T00:00:00Z\n---\n", path()).unwrap();
        assert_eq!(json.get("date"), yaml.get("date"));
        assert!(json.get("date").is_some());
    }

    #[test]
    fn empty_block_and_crlf() {
        assert!(extract("---\n---\nbody", path()).unwrap().is_empty());
        assert!(extract("-----\r\n\r\n-----\r\n", path()).unwrap().is_empty());

        let fm = extract("---\r\ndate: 2020-01-01\r\n---\r\nbody", path()).unwrap();
        assert_eq!(fm.get("date"), Some(&Value::from("2020-01-01")));
    }

    #[test]
    fn dashes_inside_body_line_do_not_close_block() {
        let raw = "---\nsummary: \"--- not a delimiter\"\n---\n";
        let fm = extract(raw, path()).unwrap();
        assert_eq!(fm.get("summary"), Some(&Value::from("--- not a delimiter")));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let err = extract("---\ntitle: x\n\nbody", path()).unwrap_err();
        assert!(matches!(err, Error::UnterminatedFrontMatter { .. }));
        assert!(err.to_string().contains("hello.md"));
    }

    #[test]
    fn json_without_closing_brace() {
        let err = extract("---\n{\"date\": \"2021-01-01\"\n---\n", path()).unwrap_err();
        assert!(matches!(err, Error::MalformedJson { .. }));
    }

    #[test]
    fn json_parse_error_is_wrapped() {
        let err = extract("---\n{\"date\": }\n---\n", path()).unwrap_err();
        match err {
            Error::MalformedJson { path: p, .. } => assert_eq!(p, path()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn yaml_parse_error_is_wrapped() {
        let err = extract("---\ntitle: [unclosed\n---\n", path()).unwrap_err();
        assert!(matches!(err, Error::MalformedYaml { .. }));
    }

    #[test]
    fn yaml_must_be_a_mapping() {
        let err = extract("---\n- a\n- b\n---\n", path()).unwrap_err();
        assert!(matches!(err, Error::MalformedYaml { .. }));
    }

    #[test]
    fn yaml_custom_tags_are_rejected() {
        let err = extract("---\ndate: !exec rm -rf /\n---\n", path()).unwrap_err();
        match err {
            Error::MalformedYaml { detail, .. } => assert!(detail.contains("exec")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn horizontal_rule_later_in_text_is_not_front_matter() {
        let fm = extract("intro\n---\nmore\n---\n", path()).unwrap();
        assert!(fm.is_empty());
    }
}
