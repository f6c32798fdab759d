//! EisenXML writer.
//!
//! Output matches the layout the node's loader expects: an XML declaration,
//! two-space indentation, self-closing call elements, attributes in the order
//! `transforms`, `count`, then `rule`/`shape`.

use crate::ruleset::{Call, CallTarget, Rule, RuleSet};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render a rule set as a pretty-printed EisenXML document.
pub fn to_eisenxml(rule_set: &RuleSet) -> String {
    let mut out = String::from("<?xml version=\"1.0\" ?>\n");
    if rule_set.rules.is_empty() {
        let _ = writeln!(
            out,
            "<rules max_depth=\"{}\"/>",
            escape(rule_set.max_depth.as_str())
        );
        return out;
    }
    let _ = writeln!(
        out,
        "<rules max_depth=\"{}\">",
        escape(rule_set.max_depth.as_str())
    );
    for rule in &rule_set.rules {
        write_rule(&mut out, rule);
    }
    out.push_str("</rules>\n");
    out
}

fn write_rule(out: &mut String, rule: &Rule) {
    let mut attrs = vec![("name", rule.name.clone())];
    if let Some(weight) = &rule.weight {
        attrs.push(("weight", weight.to_string()));
    }
    if let Some(depth) = &rule.max_depth {
        attrs.push(("max_depth", depth.to_string()));
    }
    if let Some(successor) = &rule.successor {
        attrs.push(("successor", successor.clone()));
    }

    out.push_str(INDENT);
    open_tag(out, "rule", &attrs);
    if rule.calls.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for call in &rule.calls {
        write_call(out, call);
    }
    out.push_str(INDENT);
    out.push_str("</rule>\n");
}

fn write_call(out: &mut String, call: &Call) {
    let mut attrs = vec![("transforms", call.transforms.clone())];
    if let Some(count) = &call.count {
        attrs.push(("count", count.to_string()));
    }
    let element = match &call.target {
        CallTarget::Rule(name) => {
            attrs.push(("rule", name.clone()));
            "call"
        }
        CallTarget::Shape(name) => {
            attrs.push(("shape", name.clone()));
            "instance"
        }
    };
    out.push_str(INDENT);
    out.push_str(INDENT);
    open_tag(out, element, &attrs);
    out.push_str("/>\n");
}

fn open_tag(out: &mut String, element: &str, attrs: &[(&str, String)]) {
    out.push('<');
    out.push_str(element);
    for (key, value) in attrs {
        let _ = write!(out, " {key}=\"{}\"", escape(value));
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rules_calls_and_instances() {
        let rules = RuleSet::from_source(
            "set maxdepth 20\n2 * { x 1 } R1\nrule R1 w 0.5 md 4 > R2 { { s 2 } sphere }\nrule R2 { }",
        )
        .expect("lower");
        let xml = to_eisenxml(&rules);
        let expected = "<?xml version=\"1.0\" ?>\n\
<rules max_depth=\"20\">\n  \
<rule name=\"entry\">\n    \
<call transforms=\"tx 1\" count=\"2\" rule=\"R1\"/>\n  \
</rule>\n  \
<rule name=\"R1\" weight=\"0.5\" max_depth=\"4\" successor=\"R2\">\n    \
<instance transforms=\"sa 2\" shape=\"sphere\"/>\n  \
</rule>\n  \
<rule name=\"R2\"/>\n\
</rules>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
