//! Path selection over the source tree
//!
//! Supports the subset of XPath that tests and tools use to pick nodes out
//! of an XSD: child steps, `//` descendant steps, optional prefixes, the `*`
//! wildcard and 1-based positional predicates such as
//! `//xs:schema/xs:complexType[2]/xs:sequence/xs:element[3]`.
//! The conversion itself never queries by path.

use crate::documents::Element;

/// A single step in a path expression
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// The kind of step
    pub kind: PathStepKind,
    /// The local name (`*` for any)
    pub name: String,
    /// Optional namespace prefix
    pub prefix: Option<String>,
    /// Optional predicate
    pub predicate: Option<String>,
}

/// Kind of path step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStepKind {
    /// Child axis (default)
    Child,
    /// Descendant-or-self axis (//)
    DescendantOrSelf,
    /// Self axis (.)
    Self_,
}

impl PathStep {
    /// Parse a step from a string
    pub fn parse(step: &str) -> Self {
        let step = step.trim();

        if step == ".//" {
            return Self::axis(PathStepKind::DescendantOrSelf);
        }
        if step == "." {
            return Self::axis(PathStepKind::Self_);
        }

        let step = step.strip_prefix("child::").unwrap_or(step);
        let (name_part, predicate) = match step.find('[') {
            Some(pos) => {
                let end = step.rfind(']').unwrap_or(step.len());
                (&step[..pos], Some(step[pos + 1..end].trim().to_string()))
            }
            None => (step, None),
        };
        let (prefix, name) = match name_part.split_once(':') {
            Some((p, n)) => (Some(p.to_string()), n.to_string()),
            None => (None, name_part.to_string()),
        };

        Self {
            kind: PathStepKind::Child,
            name,
            prefix,
            predicate,
        }
    }

    fn axis(kind: PathStepKind) -> Self {
        Self {
            kind,
            name: String::new(),
            prefix: None,
            predicate: None,
        }
    }

    /// Check if this step matches any element (*)
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }

    /// Whether an element satisfies the name test of this step
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(prefix) = &self.prefix {
            if element.prefix.as_deref() != Some(prefix.as_str()) {
                return false;
            }
        }
        self.is_wildcard() || element.local_name() == self.name
    }

    /// The 1-based position demanded by the predicate
    ///
    /// `Err(())` for predicates this module cannot evaluate.
    fn position(&self) -> Result<Option<usize>, ()> {
        match &self.predicate {
            None => Ok(None),
            Some(p) => p.parse::<usize>().map(Some).map_err(|_| ()),
        }
    }
}

/// Split a path expression into path steps
///
/// Handles both `/` and `//` separators. A leading `//` becomes a `.//`
/// marker step; a single leading `/` is dropped.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.trim();
    if path.is_empty() {
        return Vec::new();
    }

    let mut steps = Vec::new();
    let mut current_start = 0;

    if path.starts_with("//") {
        steps.push(".//");
        current_start = 2;
    } else if path.starts_with('/') {
        current_start = 1;
    }

    let mut in_predicate = 0;
    let bytes = path.as_bytes();
    let len = bytes.len();
    let mut i = current_start;

    while i < len {
        match bytes[i] {
            b'[' => in_predicate += 1,
            b']' => in_predicate -= 1,
            b'/' if in_predicate == 0 => {
                if i > current_start {
                    steps.push(&path[current_start..i]);
                }
                if i + 1 < len && bytes[i + 1] == b'/' {
                    steps.push(".//");
                    current_start = i + 2;
                    i += 2;
                    continue;
                }
                current_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if current_start < len {
        steps.push(&path[current_start..]);
    }

    steps
}

/// Evaluation context: the virtual document node or an element
#[derive(Clone, Copy)]
enum Context<'a> {
    Document(&'a Element),
    Element(&'a Element),
}

impl<'a> Context<'a> {
    fn children(self) -> Vec<&'a Element> {
        match self {
            Context::Document(root) => vec![root],
            Context::Element(e) => e.elements().collect(),
        }
    }

    fn descendants(self) -> Vec<&'a Element> {
        let mut out = Vec::new();
        for child in self.children() {
            collect_descendants(child, &mut out);
        }
        out
    }
}

fn collect_descendants<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(element);
    for child in element.elements() {
        collect_descendants(child, out);
    }
}

/// Every element under `root` matching `path`
///
/// Absolute paths start at the document (so their first step names the
/// root element); relative paths start at `root` itself.
pub fn select<'a>(root: &'a Element, path: &str) -> Vec<&'a Element> {
    let absolute = path.trim_start().starts_with('/');
    let mut contexts = vec![if absolute {
        Context::Document(root)
    } else {
        Context::Element(root)
    }];
    let mut descendant = false;

    for step in split_path(path).into_iter().map(PathStep::parse) {
        match step.kind {
            PathStepKind::DescendantOrSelf => descendant = true,
            PathStepKind::Self_ => {}
            PathStepKind::Child => {
                let Ok(position) = step.position() else {
                    return Vec::new();
                };
                let mut next = Vec::new();
                for ctx in &contexts {
                    let candidates = if descendant {
                        ctx.descendants()
                    } else {
                        ctx.children()
                    };
                    let matched = candidates.into_iter().filter(|e| step.matches(e));
                    match position {
                        Some(n) => next.extend(matched.skip(n.saturating_sub(1)).take(1).filter(|_| n > 0)),
                        None => next.extend(matched),
                    }
                }
                contexts = next.into_iter().map(Context::Element).collect();
                descendant = false;
            }
        }
    }

    contexts
        .into_iter()
        .filter_map(|c| match c {
            Context::Element(e) => Some(e),
            Context::Document(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::XsdDocument;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType name="First">
    <xs:sequence><xs:element name="A"/></xs:sequence>
  </xs:complexType>
  <xs:complexType name="Second">
    <xs:sequence>
      <xs:element name="B"/>
      <xs:element name="C"/>
      <xs:element name="D"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

    fn doc() -> XsdDocument {
        XsdDocument::from_string("paths.xsd", SCHEMA).unwrap()
    }

    #[test]
    fn test_split_path_simple() {
        assert_eq!(split_path("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split_path("/a/b"), vec!["a", "b"]);
        assert_eq!(split_path("//a/b"), vec![".//", "a", "b"]);
        assert_eq!(split_path("a//b"), vec!["a", ".//", "b"]);
        assert_eq!(split_path("a[1]/b"), vec!["a[1]", "b"]);
    }

    #[test]
    fn test_path_step_parse() {
        let step = PathStep::parse("xs:element[3]");
        assert_eq!(step.kind, PathStepKind::Child);
        assert_eq!(step.prefix.as_deref(), Some("xs"));
        assert_eq!(step.name, "element");
        assert_eq!(step.predicate.as_deref(), Some("3"));
        assert!(PathStep::parse("*").is_wildcard());
    }

    #[test]
    fn test_select_positional() {
        let doc = doc();
        let element = doc
            .select1("//xs:schema/xs:complexType[2]/xs:sequence/xs:element[3]")
            .unwrap();
        assert_eq!(element.attribute("name"), Some("D"));
    }

    #[test]
    fn test_select_descendants() {
        let doc = doc();
        let names: Vec<_> = doc
            .select("//xs:element")
            .into_iter()
            .filter_map(|e| e.attribute("name"))
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_select_relative_and_wildcard() {
        let doc = doc();
        assert_eq!(select(&doc.root, "xs:complexType").len(), 2);
        assert_eq!(select(&doc.root, "*/*/*").len(), 4);
    }

    #[test]
    fn test_prefix_must_match_when_given() {
        let doc = doc();
        assert!(doc.select("//xsd:element").is_empty());
        assert_eq!(doc.select("//element").len(), 4);
    }

    #[test]
    fn test_out_of_range_or_unsupported_predicate() {
        let doc = doc();
        assert!(doc.select1("/xs:schema/xs:complexType[5]").is_none());
        assert!(doc.select1("/xs:schema/xs:complexType[0]").is_none());
        assert!(doc.select("/xs:schema/xs:complexType[@name='First']").is_empty());
    }
}
