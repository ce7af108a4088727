//! Closed enumerations naming the state variables and parameters of a model.
use std::fmt;

use crate::error::CPGError;

/// A key of a closed enumeration, e.g., the state variables of a neuron model.
///
/// Every key maps to a dense index in `0..ALL.len()` and to a stable name used in configuration files and trace headers.
/// Implementations are generated with the [`keys!`](crate::keys) macro.
pub trait Key: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// All keys, ordered by index.
    const ALL: &'static [Self];

    /// Returns the dense index of the key.
    fn index(self) -> usize;

    /// Returns the name of the key.
    fn name(self) -> &'static str;

    /// Returns the number of keys in the enumeration.
    fn count() -> usize {
        Self::ALL.len()
    }

    /// Returns the key with the provided name.
    /// The function returns an error if no key has this name.
    fn from_name(name: &str) -> Result<Self, CPGError> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .ok_or_else(|| {
                CPGError::UnknownKey(format!(
                    "{} (expected one of: {})",
                    name,
                    Self::ALL
                        .iter()
                        .map(|key| key.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Declares a fieldless enum implementing [`Key`](crate::core::key::Key).
///
/// # Examples
///
/// ```rust
/// use rusty_cpg::keys;
/// use rusty_cpg::core::key::Key;
///
/// keys! {
///     /// Variables of a toy model.
///     pub enum ToyVariable {
///         X => "x",
///         Y => "y",
///     }
/// }
///
/// assert_eq!(ToyVariable::Y.index(), 1);
/// assert_eq!(ToyVariable::from_name("x").unwrap(), ToyVariable::X);
/// assert_eq!(ToyVariable::count(), 2);
/// ```
#[macro_export]
macro_rules! keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::core::key::Key for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str($crate::core::key::Key::name(*self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::keys! {
        enum Gate {
            Activation => "m",
            Inactivation => "h",
            Potassium => "n",
        }
    }

    #[test]
    fn test_key_indices_are_dense() {
        for (i, key) in Gate::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
        assert_eq!(Gate::count(), 3);
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Gate::from_name("h"), Ok(Gate::Inactivation));
        assert_eq!(Gate::Potassium.to_string(), "n");
        match Gate::from_name("p") {
            Err(CPGError::UnknownKey(msg)) => assert!(msg.contains("m, h, n")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
