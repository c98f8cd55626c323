//! The parser hook that turns spec strings into [`Thing`]s.
//!
//! Mobforge doesn't know what an item or a potion effect is. The host
//! does, so it implements [`ThingParser`] and the class registry feeds it
//! spec strings with a discriminator prefix:
//!
//! | Config key | Spec passed to the parser |
//! |---|---|
//! | `items` | `stick` |
//! | `armor` | `armor:iron_helmet` |
//! | `helmet` (and other slots) | `helmet:iron_helmet` |
//! | `effects` | `effect:speed` |
//! | `permissions`, `lobby-permissions` | `perm:some.node` |

use mobforge_types::Thing;

/// Parses a spec string into an opaque [`Thing`].
///
/// Returning `None` means "not parseable". The parser is expected to log
/// its own diagnostics; callers just drop the entry.
///
/// Any `Fn(&str) -> Option<Thing>` closure is a parser:
///
/// ```rust
/// use mobforge_class::ThingParser;
/// use mobforge_types::Thing;
///
/// let parser = |spec: &str| (!spec.is_empty()).then(|| Thing::new(spec));
/// assert!(parser.parse("stick").is_some());
/// assert!(parser.parse("").is_none());
/// ```
pub trait ThingParser: Send + Sync + 'static {
    fn parse(&self, spec: &str) -> Option<Thing>;
}

impl<F> ThingParser for F
where
    F: Fn(&str) -> Option<Thing> + Send + Sync + 'static,
{
    fn parse(&self, spec: &str) -> Option<Thing> {
        self(spec)
    }
}
