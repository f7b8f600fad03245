use crate::render::render_raw_str;
use crate::scope::Scope;
use crate::value::{Fields, Value};

/// Names the record encoder writes itself. Caller attributes with these
/// names are written as `field.<name>` instead.
pub const RESERVED_KEYS: [&str; 5] = ["time", "level", "file", "line", "message"];

const RESERVED_PREFIX: &str = "field.";

/// One attribute that survived merging.
#[derive(Debug, Clone, Copy)]
pub struct MergedField<'a> {
    pub key: &'a str,
    pub value: &'a Value,
    /// 0 for call-site fields, 1 for the nearest scope, and so on.
    pub depth: usize,
    pub reserved: bool,
}

impl MergedField<'_> {
    /// The key as it appears in the output.
    pub fn emitted_key(&self) -> String {
        if self.reserved {
            format!("{RESERVED_PREFIX}{}", self.key)
        } else {
            self.key.to_owned()
        }
    }

    /// Append the escaped output key, without quotes.
    pub fn render_key(&self, out: &mut Vec<u8>) {
        if self.reserved {
            out.extend_from_slice(RESERVED_PREFIX.as_bytes());
        }
        render_raw_str(out, self.key);
    }
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Flatten `local` and every scope in `chain` into one set sorted by key.
///
/// When a name appears more than once, the most local definition wins:
/// `local` beats the nearest scope, which beats its ancestors. No output key
/// (after the `field.` rename) appears twice.
pub fn merge<'a>(chain: Option<&'a Scope>, local: &'a Fields) -> Vec<MergedField<'a>> {
    let mut kv = Vec::with_capacity(local.len());
    let mut push = |fields: &'a Fields, depth: usize| {
        kv.extend(fields.iter().map(|(key, value)| MergedField {
            key: key.as_str(),
            value,
            depth,
            reserved: false,
        }));
    };

    push(local, 0);
    for (i, scope) in chain.into_iter().flat_map(Scope::ancestors).enumerate() {
        push(scope.fields(), i + 1);
    }

    // Stable: among equal keys the more local entry stays first.
    kv.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
    kv.dedup_by(|later, first| later.key == first.key);

    for field in &mut kv {
        field.reserved = is_reserved(field.key);
    }

    // A renamed key can land on a literal `field.<name>` key. Keep the more
    // local of the two; on a tie the literal key wins.
    let mut shadowed = Vec::new();
    for (i, field) in kv.iter().enumerate().filter(|(_, f)| f.reserved) {
        let literal = field.emitted_key();
        if let Ok(j) = kv.binary_search_by(|f| f.key.as_bytes().cmp(literal.as_bytes())) {
            shadowed.push(if field.depth < kv[j].depth { j } else { i });
        }
    }
    if !shadowed.is_empty() {
        let mut i = 0;
        kv.retain(|_| {
            let keep = !shadowed.contains(&i);
            i += 1;
            keep
        });
    }
    kv
}
