use crate::field::{Field, RULE_VALUE_SEPARATOR};

/// 规则运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Contains,
    DoesNotContain,
    Equals,
    DoesNotEqual,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    After,
    Before,
    InTheLast,
    NotInTheLast,
    True,
    False,
    Between,
}

static OPERATORS: [(Operator, &str); 15] = [
    (Operator::Contains, "contains"),
    (Operator::DoesNotContain, "doesnotcontain"),
    (Operator::Equals, "is"),
    (Operator::DoesNotEqual, "isnot"),
    (Operator::StartsWith, "startswith"),
    (Operator::EndsWith, "endswith"),
    (Operator::GreaterThan, "greaterthan"),
    (Operator::LessThan, "lessthan"),
    (Operator::After, "after"),
    (Operator::Before, "before"),
    (Operator::InTheLast, "inthelast"),
    (Operator::NotInTheLast, "notinthelast"),
    (Operator::True, "true"),
    (Operator::False, "false"),
    (Operator::Between, "between"),
];

impl Operator {
    /// 按名称查找运算符 (不区分大小写), 未知名称视为 `contains`
    pub fn from_name(name: &str) -> Operator {
        OPERATORS
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(op, _)| *op)
            .unwrap_or(Operator::Contains)
    }

    pub fn name(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, n)| *n)
            .unwrap_or("contains")
    }
}

/// 组合类型: AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn separator(self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

/// 单条规则: 字段、运算符与参数列表, 例如: `genre contains "Rock"`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub field: Field,
    pub operator: Operator,
    /// 参数均为未解释的字符串, 数值/日期语义在编译时才应用
    pub parameters: Vec<String>,
}

impl Rule {
    pub fn new<I, S>(field: Field, operator: Operator, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule {
            field,
            operator,
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// 从单个字符串构造, 按 " / " 拆分为多个参数
    pub fn with_parameter_string(field: Field, operator: Operator, value: &str) -> Self {
        Rule::new(field, operator, value.split(RULE_VALUE_SEPARATOR))
    }

    /// 第一个参数, 没有参数时为空字符串
    pub fn first_parameter(&self) -> &str {
        self.parameters.first().map(String::as_str).unwrap_or("")
    }

    /// 参数拼接回单个字符串
    pub fn parameter_string(&self) -> String {
        self.parameters.join(RULE_VALUE_SEPARATOR)
    }
}

/// 规则组合节点: 组合类型以及子规则和子组合, 构成一棵树
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleCombination {
    pub combinator: Combinator,
    pub rules: Vec<Rule>,
    pub combinations: Vec<RuleCombination>,
}

impl RuleCombination {
    pub fn new(combinator: Combinator) -> Self {
        RuleCombination {
            combinator,
            rules: Vec::new(),
            combinations: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_combination(mut self, combination: RuleCombination) -> Self {
        self.combinations.push(combination);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.combinations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_names() {
        assert_eq!(Operator::from_name("IsNot"), Operator::DoesNotEqual);
        assert_eq!(Operator::from_name("inthelast"), Operator::InTheLast);
        assert_eq!(Operator::from_name("whatever"), Operator::Contains);
        assert_eq!(Operator::Equals.name(), "is");
    }

    #[test]
    fn test_rule_parameter_string() {
        let rule = Rule::with_parameter_string(Field::Genre, Operator::Equals, "Rock / Pop");
        assert_eq!(rule.parameters, vec!["Rock", "Pop"]);
        assert_eq!(rule.first_parameter(), "Rock");
        assert_eq!(rule.parameter_string(), "Rock / Pop");
    }

    #[test]
    fn test_combination_tree() {
        let tree = RuleCombination::new(Combinator::Or)
            .with_rule(Rule::new(Field::Title, Operator::Contains, ["a"]))
            .with_combination(
                RuleCombination::new(Combinator::And)
                    .with_rule(Rule::new(Field::Year, Operator::Equals, ["1999"])),
            );
        assert!(!tree.is_empty());
        assert_eq!(tree.rules[0].field, Field::Title);
        assert_eq!(tree.combinations[0].rules[0].field, Field::Year);
        assert!(RuleCombination::default().is_empty());
        assert_eq!(Combinator::Or.separator(), " OR ");
    }
}
