use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::flags::Flags;
use crate::level::Level;
use crate::merge::merge;
use crate::render::{render_raw_str, render_str, render_time, render_u64, render_value};
use crate::scope::Scope;
use crate::value::Fields;

/// Source location of the call that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> Location<'a> {
    /// The final path element of `file`.
    pub fn short_file(&self) -> &'a str {
        self.file.rsplit(&['/', '\\'][..]).next().unwrap_or(self.file)
    }
}

impl From<&'static std::panic::Location<'static>> for Location<'static> {
    fn from(loc: &'static std::panic::Location<'static>) -> Self {
        Location {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

/// Logger settings that shape every record.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions<'a> {
    pub flags: Flags,
    pub prefix: &'a str,
}

/// A single logging event, borrowed from the call site.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: &'a str,
    /// `None` when the caller is unknown; written as `"???"` and line 0.
    pub location: Option<Location<'a>>,
    /// Call-site fields.
    pub fields: &'a Fields,
    /// The scope chain the call was made in.
    pub scope: Option<&'a Scope>,
}

impl Record<'_> {
    /// Append this record to `out` as one JSON object and a newline.
    ///
    /// Built-in fields come first in a fixed order (`time`, `level`,
    /// `message`, `file`, `line`), followed by the merged caller fields in
    /// key order. On error `out` may hold a partial line.
    pub fn encode(&self, opts: &EncodeOptions<'_>, out: &mut Vec<u8>) -> Result<()> {
        let flags = opts.flags;
        out.push(b'{');

        if flags.has_timestamp() {
            out.extend_from_slice(b"\"time\":\"");
            render_time(out, self.time, flags);
            out.extend_from_slice(b"\",");
        }

        out.extend_from_slice(b"\"level\":");
        render_str(out, &self.level.name());

        out.extend_from_slice(b",\"message\":\"");
        if flags.contains(Flags::MSG_PREFIX) {
            render_raw_str(out, self.message);
            render_raw_str(out, opts.prefix);
        } else {
            render_raw_str(out, opts.prefix);
            render_raw_str(out, self.message);
        }
        out.push(b'"');

        if flags.has_location() {
            let (file, line) = match &self.location {
                Some(loc) if flags.contains(Flags::SHORT_FILE) => (loc.short_file(), loc.line),
                Some(loc) => (loc.file, loc.line),
                None => ("???", 0),
            };
            out.extend_from_slice(b",\"file\":");
            render_str(out, file);
            out.extend_from_slice(b",\"line\":");
            render_u64(out, u64::from(line));
        }

        for field in merge(self.scope, self.fields) {
            out.extend_from_slice(b",\"");
            field.render_key(out);
            out.extend_from_slice(b"\":");
            render_value(out, field.value, flags)?;
        }

        out.extend_from_slice(b"}\n");
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn to_line(&self, opts: &EncodeOptions<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        self.encode(opts, &mut out)?;
        Ok(out)
    }
}
