//! Parse input configuration file

use std::path::Path;
use yaml_rust::{YamlLoader, yaml::Yaml};
use evalexpr::*;

use crate::constants::*;

mod error;
mod types;
mod timing;
mod settings;

pub use error::*;
use types::*;
pub use timing::*;
pub use settings::*;

/// Represents the input configuration, which defines values
/// for the detector, sampler and table parameters.
pub struct Config {
    input: Yaml,
    ctx: HashMapContext,
}

impl Config {
    /// Loads a configuration file.
    /// Fails if the file cannot be opened or if it is not
    /// YAML-formatted.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|_| InputError::file())?;
        Self::from_string(&contents)
    }

    /// Loads a YAML configuration from a string.
    /// Fails if the string is not formatted correctly.
    pub fn from_string(s: &str) -> Result<Self, InputError> {
        let input = YamlLoader::load_from_str(s)
            .map_err(|_| InputError::file())?;
        let input = input.first()
            .ok_or(InputError::file())?;

        Ok(Config {
            input: input.clone(),
            ctx: HashMapContext::new(),
        })
    }

    /// Loads automatic values for constants and mathematical functions.
    /// Also loads and evaluates mathematical expressions
    /// that are given in the specified `section`.
    pub fn with_context(&mut self, section: &str) -> Result<&mut Self, InputError> {
        use helper::context_function;

        let mut ctx = context_map! {
            "c" => SPEED_OF_LIGHT,
            "pi" => std::f64::consts::PI,
            "degree" => std::f64::consts::PI / 180.0,
            "centi" => 1.0e-2,
            "milli" => 1.0e-3,
            "micro" => 1.0e-6,
            "nano" => 1.0e-9,
            "pico" => 1.0e-12,
        }.map_err(|_| InputError::conversion(section, "built-in constants"))?;

        context_function!(ctx, section, "sqrt",  f64::sqrt);
        context_function!(ctx, section, "abs",   f64::abs);
        context_function!(ctx, section, "exp",   f64::exp);
        context_function!(ctx, section, "ln",    f64::ln);
        context_function!(ctx, section, "sin",   f64::sin);
        context_function!(ctx, section, "cos",   f64::cos);
        context_function!(ctx, section, "tan",   f64::tan);
        context_function!(ctx, section, "asin",  f64::asin);
        context_function!(ctx, section, "acos",  f64::acos);
        context_function!(ctx, section, "atan",  f64::atan);
        context_function!(ctx, section, "atan2", f64::atan2, 2);

        self.ctx = ctx;

        // Read in from 'constants' block if it exists
        if self.input[section].is_badvalue() {
            return Ok(self);
        }

        let block = self.input[section].as_hash()
            .ok_or_else(|| InputError::conversion(section, section))?;

        for (a, b) in block {
            let key = match a {
                Yaml::String(k) => k,
                _ => return Err(InputError::conversion(section, section)),
            };

            let value = match b {
                Yaml::Integer(i) => Some(*i as f64),
                Yaml::Real(s) => s.parse::<f64>().ok(),
                Yaml::String(s) => eval_number_with_context(s, &self.ctx).ok(),
                _ => None,
            };

            // insert it into the context so it's available for the next read
            match value {
                Some(v) => self.ctx.set_value(key.clone(), Value::from(v))
                    .map_err(|_| InputError::conversion(section, key))?,
                None => return Err(InputError::conversion(section, key)),
            }
        }

        Ok(self)
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse the value as the specified type.
    /// The path to the key-value pair is specified by a string of colon-separated
    /// sections, e.g. `'section:subsection:key'`.
    pub fn read<T, S>(&self, path: S) -> Result<T, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        let address: Vec<&str> = path.as_ref().split(':').collect();
        let value = address.iter()
            .try_fold(&self.input, |y, s| {
                if y[*s].is_badvalue() {
                    Err(InputError::location(path.as_ref(), s))
                } else {
                    Ok(&y[*s])
                }
            })?;
        let last = address.last().copied().unwrap_or_default();
        T::from_yaml(value.clone(), &self.ctx)
            .map_err(|_| InputError::conversion(path.as_ref(), last))
    }

    /// Like `Config::read`, but falls back to `default` if the field
    /// is absent. A field that is present but cannot be parsed is
    /// still an error.
    pub fn read_or<T, S>(&self, path: S, default: T) -> Result<T, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        match self.read(path) {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == InputErrorKind::Location => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Does the configuration contain the section, or key, at `path`?
    pub fn contains<S: AsRef<str>>(&self, path: S) -> bool {
        path.as_ref()
            .split(':')
            .try_fold(&self.input, |y, s| if y[s].is_badvalue() {None} else {Some(&y[s])})
            .is_some()
    }
}

mod helper {
    macro_rules! context_function {
        ($ctx:expr, $section:expr, $name:literal, $func:expr) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let x = arg.as_number()?;
                    Ok(Value::Float($func(x)))
                })
            ).map_err(|_| InputError::conversion($section, $name))?
        };
        ($ctx:expr, $section:expr, $name:literal, $func:expr, 2) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let arg = arg.as_fixed_len_tuple(2)?;
                    let x = arg[0].as_number()?;
                    let y = arg[1].as_number()?;
                    Ok(Value::Float($func(x, y)))
                })
            ).map_err(|_| InputError::conversion($section, $name))?
        };
    }

    pub(super) use context_function;
}
