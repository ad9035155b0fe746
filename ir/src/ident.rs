//! Interned nominal identifiers.
//!
//! Two identifiers compare by the pointer/index `lalrpop_intern` hands
//! back, not by string content, so that `ValueType`'s derived
//! structural `Eq`/`Hash` stay cheap regardless of how long the
//! surface-syntax name was.

use lalrpop_intern::InternedString;
use std::fmt;

macro_rules! interned_id {
    ($name:ident) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(InternedString);

        impl $name {
            pub fn new(text: &str) -> Self {
                $name(lalrpop_intern::intern(text))
            }

            pub fn as_str(self) -> &'static str {
                self.0.as_str()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                $name::new(text)
            }
        }
    };
}

interned_id!(CtorId);
interned_id!(InterfaceId);
interned_id!(TypeParamId);
interned_id!(CaptureParamId);
interned_id!(CapabilityId);
interned_id!(EffectId);
