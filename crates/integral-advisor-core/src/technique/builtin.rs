//! Builtin Technique Rules
//!
//! The rule table shipped with the crate, listed in evaluation order.
//! Order is significant: the first rule whose pattern matches wins.
//! Patterns run on normalized text, which never contains whitespace.

use serde::{Deserialize, Serialize};

/// Builtin rules, highest priority first.
pub const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "trig-substitution",
        patterns: &[
            r"sqrt\([0-9]+[-+]x\^2\)",
            r"sqrt\(x\^2-[0-9]+\)",
        ],
        result: BuiltinResult {
            method: "Sustitución Trigonométrica",
            category: "Integral con Radicales de Formas Cuadráticas",
            explanation: "La presencia de una raíz cuadrada conteniendo una suma o diferencia \
                          de cuadrados (como a² - x², x² + a², o x² - a²) sugiere el uso de \
                          sustituciones trigonométricas (x = a*sin(θ), x = a*tan(θ), o \
                          x = a*sec(θ)) para simplificar la integral.",
            example: "∫ dx / (x^2 * sqrt(x^2 - 9))",
        },
    },
    BuiltinRule {
        name: "by-parts",
        patterns: &[r"x\^?[0-9]*\*(sin|cos|tan|ln|log|e\^)"],
        result: BuiltinResult {
            method: "Integración por Partes",
            category: "Integral de un Producto de Funciones",
            explanation: "Se identifica un producto de funciones de diferente naturaleza \
                          (algebraica, logarítmica, trigonométrica, exponencial). El método de \
                          integración por partes (∫ u dv = uv - ∫ v du) es ideal para estos \
                          casos. Se recomienda usar la regla mnemotécnica LIATE o ILATE para \
                          elegir \"u\".",
            example: "∫ x * e^x dx",
        },
    },
    BuiltinRule {
        name: "partial-fractions",
        patterns: &[r"\(.*\)/\(.*x\^2.*\)"],
        result: BuiltinResult {
            method: "Fracciones Parciales",
            category: "Integral de una Función Racional",
            explanation: "La integral es un cociente de polinomios. Este método consiste en \
                          descomponer la fracción racional en una suma de fracciones más \
                          simples, las cuales son más fáciles de integrar individualmente. Se \
                          requiere factorizar el denominador.",
            example: "∫ (5x - 3) / (x^2 - 2x - 3) dx",
        },
    },
    BuiltinRule {
        name: "trig-powers",
        patterns: &[r"(sin|cos|tan|sec|csc|cot)\^[0-9]+"],
        result: BuiltinResult {
            method: "Integrales Trigonométricas",
            category: "Potencias de Funciones Trigonométricas",
            explanation: "La integral contiene potencias de funciones trigonométricas. Se \
                          utilizan identidades trigonométricas (pitagóricas, de ángulo doble, \
                          etc.) para reducir la complejidad del integrando a formas más básicas.",
            example: "∫ sin^2(x) * cos^3(x) dx",
        },
    },
    BuiltinRule {
        name: "u-substitution",
        patterns: &[r"x\*.*\(x\^2\)"],
        result: BuiltinResult {
            method: "Sustitución en U (Cambio de Variable)",
            category: "Regla de la Cadena Inversa",
            explanation: "Se observa una función compuesta y la derivada (o un múltiplo de \
                          ella) de la función interna multiplicando afuera. La sustitución \
                          u = g(x) simplifica la integral a una forma más directa.",
            example: "∫ 2x * cos(x^2) dx",
        },
    },
];

/// Returned when no rule matches but the expression wraps an inner function
/// in parentheses.
pub const COMPOSITE_FALLBACK: BuiltinResult = BuiltinResult {
    method: "Sustitución en U (Cambio de Variable)",
    category: "Integral de Función Compuesta",
    explanation: "Esta es una recomendación general cuando se detecta una función \
                  \"interna\". El método de sustitución en U es una de las técnicas más \
                  fundamentales y se aplica cuando el integrando es una composición de \
                  funciones, f(g(x)), multiplicada por la derivada de la función interna, g'(x).",
    example: "∫ (x^2 + 1)^3 * 2x dx",
};

/// Returned when nothing else applies.
pub const DEFAULT_FALLBACK: BuiltinResult = BuiltinResult {
    method: "Revisión Directa o Sustitución Simple",
    category: "Integral Básica o No Identificada",
    explanation: "No se ha identificado un patrón claro para un método avanzado. La integral \
                  podría ser resoluble por reglas directas de integración (potencias, \
                  exponenciales, etc.) o una sustitución simple en U. Se recomienda verificar \
                  las tablas de integrales básicas.",
    example: "∫ (x^3 + 2x - 5) dx",
};

/// Static rule definition
#[derive(Debug, Clone)]
pub struct BuiltinRule {
    /// Rule name (unique identifier)
    pub name: &'static str,
    /// Regular expressions tested against the normalized expression; any match fires the rule
    pub patterns: &'static [&'static str],
    /// Suggestion returned on match
    pub result: BuiltinResult,
}

/// Static suggestion text
#[derive(Debug, Clone, Copy)]
pub struct BuiltinResult {
    pub method: &'static str,
    pub category: &'static str,
    pub explanation: &'static str,
    pub example: &'static str,
}

/// Suggested integration technique for an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Name of the suggested technique
    pub method: String,
    /// Structural class of the integral
    pub category: String,
    /// Why the technique applies
    pub explanation: String,
    /// Sample integral of the same class
    pub example: String,
}

impl From<&BuiltinResult> for ClassificationResult {
    fn from(builtin: &BuiltinResult) -> Self {
        Self {
            method: builtin.method.to_string(),
            category: builtin.category.to_string(),
            explanation: builtin.explanation.to_string(),
            example: builtin.example.to_string(),
        }
    }
}

/// Runtime rule definition
///
/// Built from [`BUILTIN_RULES`] or from the `[[rules.custom]]` entries of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub name: String,
    pub patterns: Vec<String>,
    pub result: ClassificationResult,
    /// False for rules that came from configuration
    pub builtin: bool,
}

impl From<&BuiltinRule> for RuleDef {
    fn from(builtin: &BuiltinRule) -> Self {
        Self {
            name: builtin.name.to_string(),
            patterns: builtin.patterns.iter().map(|s| s.to_string()).collect(),
            result: ClassificationResult::from(&builtin.result),
            builtin: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_order() {
        let names: Vec<_> = BUILTIN_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "trig-substitution",
                "by-parts",
                "partial-fractions",
                "trig-powers",
                "u-substitution",
            ]
        );
    }

    #[test]
    fn test_builtin_results_not_empty() {
        let results = BUILTIN_RULES
            .iter()
            .map(|r| &r.result)
            .chain([&COMPOSITE_FALLBACK, &DEFAULT_FALLBACK]);
        for result in results {
            assert!(!result.method.is_empty());
            assert!(!result.category.is_empty());
            assert!(!result.explanation.is_empty());
            assert!(!result.example.is_empty());
        }
    }

    #[test]
    fn test_rule_def_from_builtin() {
        let builtin = &BUILTIN_RULES[0];
        let def = RuleDef::from(builtin);
        assert_eq!(def.name, builtin.name);
        assert_eq!(def.patterns.len(), 2);
        assert_eq!(def.result.method, "Sustitución Trigonométrica");
        assert!(def.builtin);
    }
}
