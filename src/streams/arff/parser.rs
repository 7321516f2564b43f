use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Value};
use crate::utils::file_parsing::{closing_quote_index, split_csv_preserving_quotes, unquote};
use std::io::BufRead;

/// Header section of an ARFF document.
#[derive(Debug)]
pub(super) struct ArffHeader {
    pub relation: String,
    pub features: Vec<Feature>,
    /// Number of lines consumed, including the `@data` line.
    pub lines_read: usize,
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.trim_start()
        .get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

/// Reads `@relation` and `@attribute` lines up to and including `@data`.
pub(super) fn parse_header<R: BufRead>(reader: &mut R) -> Result<ArffHeader> {
    let mut relation: Option<String> = None;
    let mut features: Vec<Feature> = Vec::new();
    let mut line = String::new();
    let mut lines_read = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(MlError::malformed_data("ARFF file ended before @data"));
        }
        lines_read += 1;
        if is_comment_or_empty(&line) {
            continue;
        }

        if starts_with_keyword(&line, "@relation") {
            if relation.is_some() || !features.is_empty() {
                return Err(MlError::malformed_data(format!(
                    "line {lines_read}: unexpected @relation"
                )));
            }
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(unquote(raw).into_owned());
        } else if starts_with_keyword(&line, "@attribute") {
            let feature = parse_attribute_line(&line)
                .map_err(|e| MlError::malformed_data(format!("line {lines_read}: {e}")))?;
            if features.iter().any(|f| f.name() == feature.name()) {
                return Err(MlError::malformed_data(format!(
                    "line {lines_read}: duplicate attribute '{}'",
                    feature.name()
                )));
            }
            features.push(feature);
        } else if starts_with_keyword(&line, "@data") {
            break;
        } else {
            return Err(MlError::malformed_data(format!(
                "line {lines_read}: unsupported header directive: {}",
                line.trim()
            )));
        }
    }

    if features.is_empty() {
        return Err(MlError::malformed_data("ARFF header declares no attributes"));
    }

    Ok(ArffHeader {
        relation: relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        features,
        lines_read,
    })
}

pub(super) fn parse_attribute_line(line: &str) -> Result<Feature> {
    if !starts_with_keyword(line, "@attribute") {
        return Err(MlError::malformed_data("line is not '@attribute'"));
    }
    let rest = line.trim()["@attribute".len()..].trim();

    let (name, after_name) = match rest.chars().next() {
        Some('\'' | '"') => {
            let end = closing_quote_index(rest)
                .ok_or_else(|| MlError::malformed_data("attribute name without closing quote"))?;
            (unquote(&rest[..=end]).into_owned(), rest[end + 1..].trim())
        }
        _ => {
            let mut it = rest.splitn(2, char::is_whitespace);
            let name = it.next().unwrap_or_default().to_string();
            let after = it
                .next()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| MlError::malformed_data("attribute type is missing"))?;
            (name, after.trim())
        }
    };
    if name.is_empty() {
        return Err(MlError::malformed_data("attribute name is empty"));
    }

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok(Feature::numeric(name));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| MlError::malformed_data("nominal set without closing '}'"))?;
        let categories: Vec<String> = split_csv_preserving_quotes(&after_name[1..close])
            .into_iter()
            .map(|s| unquote(&s).into_owned())
            .filter(|s| !s.is_empty())
            .collect();
        if categories.is_empty() {
            return Err(MlError::malformed_data("empty nominal domain"));
        }
        return Feature::nominal(name, categories)
            .map_err(|e| MlError::malformed_data(e.to_string()));
    }

    Err(MlError::malformed_data(format!(
        "attribute kind not supported: {after_name}"
    )))
}

/// Parses one dense data line into a labelled instance.
pub(super) fn parse_instance_values(features: &[Feature], line: &str) -> Result<Instance> {
    if line.trim_start().starts_with('{') {
        return Err(MlError::malformed_data("sparse data lines are not supported"));
    }
    let tokens = split_csv_preserving_quotes(line);
    if tokens.len() != features.len() {
        return Err(MlError::malformed_data(format!(
            "number of columns ({}) differs from number of attributes ({})",
            tokens.len(),
            features.len()
        )));
    }

    let mut instance = Instance::with_capacity(tokens.len());
    for (feature, raw) in features.iter().zip(&tokens) {
        if raw == "?" {
            instance.push(Value::Missing);
            continue;
        }
        match feature {
            Feature::Numeric(_) => {
                let x: f64 = raw.parse().map_err(|_| {
                    MlError::malformed_data(format!(
                        "invalid numeric value '{raw}' for attribute '{}'",
                        feature.name()
                    ))
                })?;
                instance.push(Value::numeric(x));
            }
            Feature::Nominal(nominal) => {
                let category = unquote(raw);
                if nominal.index_of_category(&category).is_none() {
                    return Err(MlError::malformed_data(format!(
                        "value '{category}' not in the domain of attribute '{}'",
                        nominal.name()
                    )));
                }
                instance.push(Value::nominal(category));
            }
        }
    }
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(text: &str) -> Result<ArffHeader> {
        parse_header(&mut Cursor::new(text))
    }

    #[test]
    fn attribute_kinds() {
        assert_eq!(
            parse_attribute_line("@attribute temp REAL").unwrap(),
            Feature::numeric("temp")
        );
        assert_eq!(
            parse_attribute_line("@ATTRIBUTE 'wind speed' integer").unwrap(),
            Feature::numeric("wind speed")
        );
        assert_eq!(
            parse_attribute_line("@attribute play {yes, 'no'}").unwrap(),
            Feature::nominal("play", ["yes", "no"]).unwrap()
        );
        assert_eq!(
            parse_attribute_line("@attribute a {x, }").unwrap(),
            Feature::nominal("a", ["x"]).unwrap()
        );
    }

    #[test]
    fn malformed_attribute_lines() {
        for line in [
            "@attribute outlook",
            "@attribute 'bad {x, y}",
            "@relation r",
            "@attribute a {}",
            "@attribute a {   }",
            "@attribute a {x, y",
            "@attribute a {x, x}",
            "@attribute note string",
        ] {
            assert!(
                matches!(parse_attribute_line(line), Err(MlError::MalformedData(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn data_values() {
        let features = vec![
            Feature::numeric("x"),
            Feature::nominal("c", ["a b", "z"]).unwrap(),
        ];
        let inst = parse_instance_values(&features, "1.5, 'a b'").unwrap();
        assert_eq!(inst.values(), &[Value::numeric(1.5), Value::nominal("a b")]);

        let inst = parse_instance_values(&features, "?,?").unwrap();
        assert_eq!(inst.values(), &[Value::Missing, Value::Missing]);
    }

    #[test]
    fn malformed_data_values() {
        let features = vec![
            Feature::numeric("x"),
            Feature::nominal("c", ["a"]).unwrap(),
        ];
        for line in ["1", "abc,a", "1,q", "{0 1, 1 a}"] {
            assert!(
                matches!(
                    parse_instance_values(&features, line),
                    Err(MlError::MalformedData(_))
                ),
                "{line}"
            );
        }
    }

    #[test]
    fn header_without_relation_gets_a_default_name() {
        let h = header("@attribute a numeric\n@data\n1\n").unwrap();
        assert_eq!(h.relation, "unnamed_relation");
        assert_eq!(h.features.len(), 1);
        assert_eq!(h.lines_read, 2);
    }

    #[test]
    fn malformed_headers() {
        for text in [
            "@relation r\n@attribute a numeric\n",
            "@relation r\n@foo bar\n@data\n1\n",
            "@relation r\n@data\n",
            "@relation r\n@attribute a numeric\n@attribute a real\n@data\n",
            "@attribute a numeric\n@relation late\n@data\n",
        ] {
            assert!(matches!(header(text), Err(MlError::MalformedData(_))), "{text}");
        }
    }
}
