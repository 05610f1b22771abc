//! Enumerations that travel as lowercase labels in storage and on the wire.

/// Parse failure for a label-backed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`; expected one of: {}", .expected.join(", "))]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl UnknownLabel {
    /// Build the error for `value`, listing the accepted labels.
    pub fn new(kind: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }

    /// Human name of the enumeration, e.g. `bill status`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Labels that would have been accepted.
    #[must_use]
    pub fn expected(&self) -> &'static [&'static str] {
        self.expected
    }
}

/// Declare a `Copy` enum with a fixed label per variant, plus `as_str`,
/// `Display` and `FromStr`.
macro_rules! define_label_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($kind:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Accepted labels in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Storage and wire label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::labels::UnknownLabel;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($label => Ok(Self::$variant),)+
                    other => Err($crate::domain::labels::UnknownLabel::new(
                        $kind,
                        other,
                        Self::LABELS,
                    )),
                }
            }
        }
    };
}

pub(crate) use define_label_enum;
