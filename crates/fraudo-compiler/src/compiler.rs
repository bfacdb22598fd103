//! Template compiler

use crate::compiled::{
    AggregateCall, CompiledRule, CompiledTemplate, ListKind, NumericExpr, OutcomeFilter,
    Predicate, StringSource,
};
use crate::error::{CompileError, Result};
use fraudo_core::{CheckedField, Domain, Expression, FieldResolver, Position, RuleTemplate};
use fraudo_parser::TemplateParser;
use regex::Regex;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Compiles rule templates for one domain
///
/// Holds the same [`FieldResolver`] the evaluator uses, so a template only
/// compiles if every field it aggregates or reads has a storage mapping.
pub struct TemplateCompiler<'a, D: Domain> {
    resolver: &'a dyn FieldResolver<D>,
    _domain: PhantomData<D>,
}

impl<'a, D: Domain> TemplateCompiler<'a, D> {
    pub fn new(resolver: &'a dyn FieldResolver<D>) -> Self {
        Self {
            resolver,
            _domain: PhantomData,
        }
    }

    /// Parse and compile template source text
    pub fn compile_source(
        &self,
        template_id: &str,
        source: &str,
    ) -> Result<CompiledTemplate<D::Field>> {
        let template = TemplateParser::parse(source)?;
        self.compile(template_id, &template)
    }

    /// Compile a parsed template
    pub fn compile(
        &self,
        template_id: &str,
        template: &RuleTemplate,
    ) -> Result<CompiledTemplate<D::Field>> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(template.rules.len());

        for (index, rule) in template.rules.iter().enumerate() {
            let id = rule.id(index);
            if !seen.insert(id.clone()) {
                return Err(CompileError::DuplicateRule(id));
            }

            let scope = RuleScope {
                rule: &id,
                resolver: self.resolver,
            };
            rules.push(CompiledRule {
                predicate: scope.predicate(&rule.condition)?,
                action: rule.action,
                id,
            });
        }

        tracing::debug!(
            "Compiled {} template '{}' with {} rules",
            D::NAME,
            template_id,
            rules.len()
        );

        Ok(CompiledTemplate {
            id: template_id.to_string(),
            rules,
        })
    }
}

/// Compilation state for a single rule
struct RuleScope<'a, D: Domain> {
    rule: &'a str,
    resolver: &'a dyn FieldResolver<D>,
}

impl<'a, D: Domain> RuleScope<'a, D> {
    fn predicate(&self, expr: &Expression) -> Result<Predicate<D::Field>> {
        match expr {
            Expression::And(left, right) => Ok(Predicate::And(
                Box::new(self.predicate(left)?),
                Box::new(self.predicate(right)?),
            )),
            Expression::Or(left, right) => Ok(Predicate::Or(
                Box::new(self.predicate(left)?),
                Box::new(self.predicate(right)?),
            )),
            Expression::Not(inner) => Ok(Predicate::Not(Box::new(self.predicate(inner)?))),
            Expression::Compare { left, op, right } => Ok(Predicate::Compare {
                left: self.numeric(left)?,
                op: *op,
                right: self.numeric(right)?,
            }),
            Expression::Call {
                name,
                args,
                position,
            } => self.predicate_call(name, args, *position),
            Expression::Number(_) | Expression::String(_) => Err(self.type_error(
                "a literal cannot be used as a condition",
            )),
        }
    }

    fn predicate_call(
        &self,
        name: &str,
        args: &[Expression],
        position: Position,
    ) -> Result<Predicate<D::Field>> {
        match name {
            "inWhiteList" | "inBlackList" | "inGreyList" => {
                let list = match name {
                    "inWhiteList" => ListKind::White,
                    "inBlackList" => ListKind::Black,
                    _ => ListKind::Grey,
                };
                if args.is_empty() {
                    return Err(self.invalid(name, position, "expected at least one field"));
                }
                let fields = self.stored_fields(name, args, position)?;
                Ok(Predicate::InList { list, fields })
            }
            "inList" => {
                if args.len() < 2 {
                    return Err(self.invalid(name, position, "expected a list name and fields"));
                }
                let list_name = self.string_arg(name, &args[0], position)?;
                let fields = self.stored_fields(name, &args[1..], position)?;
                Ok(Predicate::InList {
                    list: ListKind::Named(list_name.to_string()),
                    fields,
                })
            }
            "in" => {
                if args.len() < 2 {
                    return Err(self.invalid(name, position, "expected a value and candidates"));
                }
                let source = self.string_source(&args[0], position)?;
                let candidates = args[1..]
                    .iter()
                    .map(|a| self.string_arg(name, a, position).map(str::to_string))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Predicate::In { source, candidates })
            }
            "equals" => {
                let [field, value] = args else {
                    return Err(self.invalid(name, position, "expected a field and a value"));
                };
                Ok(Predicate::Equals {
                    field: self.stored_field(name, field, position)?,
                    value: self.string_arg(name, value, position)?.to_string(),
                })
            }
            "like" => {
                let [field, pattern] = args else {
                    return Err(self.invalid(name, position, "expected a field and a pattern"));
                };
                let field = self.stored_field(name, field, position)?;
                let pattern = self.string_arg(name, pattern, position)?;
                let pattern = Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| self.invalid(name, position, &e.to_string()))?;
                Ok(Predicate::Like { field, pattern })
            }
            _ if is_numeric_function(name) => Err(self.type_error(&format!(
                "'{}' returns a number and must be compared",
                name
            ))),
            _ => Err(CompileError::UnknownFunction {
                rule: self.rule.to_string(),
                name: name.to_string(),
                position,
            }),
        }
    }

    fn numeric(&self, expr: &Expression) -> Result<NumericExpr<D::Field>> {
        let (name, args, position) = match expr {
            Expression::Number(n) => return Ok(NumericExpr::Literal(*n)),
            Expression::Call {
                name,
                args,
                position,
            } => (name.as_str(), args.as_slice(), *position),
            _ => return Err(self.type_error("expected a number or numeric function")),
        };

        let outcome = match name {
            "count" | "sum" => OutcomeFilter::All,
            "countSuccess" | "sumSuccess" => OutcomeFilter::Success,
            "countError" | "sumError" => OutcomeFilter::Error { code: None },
            "countRefund" | "sumRefund" => OutcomeFilter::Refund,
            "countChargeback" | "sumChargeback" => OutcomeFilter::Chargeback,
            "amount" => {
                if !args.is_empty() {
                    return Err(self.invalid(name, position, "takes no arguments"));
                }
                return Ok(NumericExpr::Amount);
            }
            "unique" => {
                if args.len() < 3 {
                    return Err(self.invalid(
                        name,
                        position,
                        "expected field, secondary field and window",
                    ));
                }
                let secondary = self.stored_field(name, &args[1], position)?;
                let call = self.aggregate_call(name, &args[0], &args[2], &args[3..], position)?;
                return Ok(NumericExpr::Unique { secondary, call });
            }
            _ if is_predicate_function(name) => {
                return Err(self.type_error(&format!(
                    "'{}' is a condition and cannot be compared",
                    name
                )))
            }
            _ => {
                return Err(CompileError::UnknownFunction {
                    rule: self.rule.to_string(),
                    name: name.to_string(),
                    position,
                })
            }
        };

        let supported = match outcome {
            OutcomeFilter::All => true,
            OutcomeFilter::Refund | OutcomeFilter::Chargeback => D::REFUND_AGGREGATES,
            OutcomeFilter::Success | OutcomeFilter::Error { .. } => D::OUTCOME_AGGREGATES,
        };
        if !supported {
            return Err(CompileError::UnsupportedFunction {
                rule: self.rule.to_string(),
                function: name.to_string(),
                domain: D::NAME,
            });
        }
        if args.len() < 2 {
            return Err(self.invalid(name, position, "expected field and window"));
        }

        // countError/sumError take the error code ahead of the group-by
        // fields; an empty code matches every error
        let (outcome, group_by) = match outcome {
            OutcomeFilter::Error { .. } if args.len() > 2 => {
                let code = self.string_arg(name, &args[2], position)?.trim();
                let code = (!code.is_empty()).then(|| code.to_string());
                (OutcomeFilter::Error { code }, &args[3..])
            }
            other => (other, &args[2..]),
        };
        let call = self.aggregate_call(name, &args[0], &args[1], group_by, position)?;

        Ok(if name.starts_with("count") {
            NumericExpr::Count {
                filter: outcome,
                call,
            }
        } else {
            NumericExpr::Sum {
                filter: outcome,
                call,
            }
        })
    }

    fn aggregate_call(
        &self,
        function: &str,
        field: &Expression,
        window: &Expression,
        group_by: &[Expression],
        position: Position,
    ) -> Result<AggregateCall<D::Field>> {
        let field = self.stored_field(function, field, position)?;
        let window_minutes = match window {
            Expression::Number(n) if *n > 0.0 && n.fract() == 0.0 => *n as u64,
            _ => {
                return Err(self.invalid(
                    function,
                    position,
                    "window must be a positive whole number of minutes",
                ))
            }
        };
        let group_by = self.stored_fields(function, group_by, position)?;

        Ok(AggregateCall {
            field,
            window_minutes,
            group_by,
        })
    }

    fn string_source(
        &self,
        expr: &Expression,
        position: Position,
    ) -> Result<StringSource<D::Field>> {
        match expr {
            Expression::Call {
                name,
                args,
                position,
            } if name == "countryBy" => {
                let [arg] = args.as_slice() else {
                    return Err(self.invalid(name, *position, "expected one geo field"));
                };
                let field = self.field(self.string_arg(name, arg, *position)?)?;
                if field.geo_dimension().is_none() {
                    return Err(self.invalid(
                        name,
                        *position,
                        &format!("'{}' is not a geo field", field),
                    ));
                }
                Ok(StringSource::Country(field))
            }
            _ => Ok(StringSource::Field(self.stored_field("in", expr, position)?)),
        }
    }

    fn stored_fields(
        &self,
        function: &str,
        args: &[Expression],
        position: Position,
    ) -> Result<Vec<D::Field>> {
        args.iter()
            .map(|a| self.stored_field(function, a, position))
            .collect()
    }

    /// Field named by a string argument that must have a storage mapping
    fn stored_field(
        &self,
        function: &str,
        expr: &Expression,
        position: Position,
    ) -> Result<D::Field> {
        let field = self.field(self.string_arg(function, expr, position)?)?;
        self.resolver
            .storage_name(field)
            .map_err(|source| CompileError::UnsupportedField {
                rule: self.rule.to_string(),
                source,
            })?;
        Ok(field)
    }

    fn field(&self, name: &str) -> Result<D::Field> {
        D::Field::from_name(name).ok_or_else(|| CompileError::UnknownField {
            rule: self.rule.to_string(),
            field: name.to_string(),
        })
    }

    fn string_arg<'e>(
        &self,
        function: &str,
        expr: &'e Expression,
        position: Position,
    ) -> Result<&'e str> {
        expr.as_str()
            .ok_or_else(|| self.invalid(function, position, "expected a string argument"))
    }

    fn invalid(&self, function: &str, position: Position, message: &str) -> CompileError {
        CompileError::InvalidArguments {
            rule: self.rule.to_string(),
            function: function.to_string(),
            position,
            message: message.to_string(),
        }
    }

    fn type_error(&self, message: &str) -> CompileError {
        CompileError::TypeError {
            rule: self.rule.to_string(),
            message: message.to_string(),
        }
    }
}

fn is_numeric_function(name: &str) -> bool {
    matches!(
        name,
        "count"
            | "countSuccess"
            | "countError"
            | "countRefund"
            | "countChargeback"
            | "sum"
            | "sumSuccess"
            | "sumError"
            | "sumRefund"
            | "sumChargeback"
            | "unique"
            | "amount"
    )
}

fn is_predicate_function(name: &str) -> bool {
    matches!(
        name,
        "inWhiteList" | "inBlackList" | "inGreyList" | "inList" | "in" | "equals" | "like"
    )
}
