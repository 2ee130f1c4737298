use std::collections::HashMap;

use crate::{
    parse::is_ident,
    typ::{Error, Lookup, Operand, Value},
};

/// Variable storage for one interpreter session.
///
/// Variables come into existence when first assigned and live as long as the store does.
/// Names are case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Variables {
    vars: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing whatever was there before.
    ///
    /// Integers must be strictly positive and text must be non-empty; anything else is
    /// rejected and leaves the store untouched.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        if !is_ident(name) {
            return Err(Error::Validation(format!(
                "{name:?} is not a valid variable name"
            )));
        }
        let value = value.into();
        match &value {
            Value::Int(x) if *x <= 0 => {
                return Err(Error::Range(format!(
                    "value of {name} must be greater than 0 (got {x})"
                )));
            }
            Value::Text(s) if s.is_empty() => {
                return Err(Error::Validation(format!(
                    "value of {name} cannot be empty"
                )));
            }
            _ => {}
        }
        log::trace!("{name} = {value}");
        self.vars.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn lookup<'a>(&'a self, name: &'a str) -> Lookup<'a> {
        match self.vars.get(name) {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound(name),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Turns a raw token into a number: integer literals stand for themselves (and never touch
    /// the store), anything else has to be the name of a variable holding an integer.
    pub fn resolve_operand(&self, token: &str) -> Result<i32, Error> {
        let token = token.trim();
        if let Ok(x) = token.parse::<i32>() {
            return Ok(x);
        }
        self.lookup(token).int().ok_or_else(|| Error::Unresolved {
            operand: token.to_owned(),
        })
    }

    pub fn resolve(&self, operand: &Operand) -> Result<i32, Error> {
        match operand {
            Operand::Lit(x) => Ok(*x),
            Operand::Var(name) => self.resolve_operand(name),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}
