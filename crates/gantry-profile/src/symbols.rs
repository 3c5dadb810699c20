//! Define-symbol resolution
//!
//! A profile carries a baseline list of compiler define symbols; headless
//! invocations may append or remove symbols on top of it. The resolver
//! produces the final `;`-joined string and reports whether it differs from
//! the previously applied set, which is what decides whether the host must
//! recompile before the build continues.

/// Characters that separate symbols in a baseline or override list.
pub const SYMBOL_SEPARATORS: [char; 4] = [',', ';', '\n', '\r'];

/// Outcome of a symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolResolution {
    /// Final `;`-joined symbol string
    pub symbols: String,
    /// Whether the result differs from the previously applied set
    pub changed: bool,
}

/// Split a delimited symbol list, dropping empty entries.
pub fn split_symbols(list: &str) -> Vec<String> {
    list.split(&SYMBOL_SEPARATORS[..])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the baseline symbol list against optional override directives.
///
/// Override entries without a `!` prefix are appended; `!NAME` removes every
/// occurrence of `NAME`. The joined result is de-duplicated, first occurrence
/// winning, so repeated removal directives are harmless. `previous` is the
/// symbol string last applied for this target; the caller owns writing the
/// result back as the new baseline.
pub fn resolve(baseline: &str, overrides: Option<&str>, previous: &str) -> SymbolResolution {
    let mut symbols = split_symbols(baseline);

    if let Some(overrides) = overrides {
        let directives = split_symbols(overrides);

        for entry in directives.iter().filter(|s| !s.starts_with('!')) {
            symbols.push(entry.clone());
        }

        for entry in directives.iter().filter(|s| s.starts_with('!')) {
            let name = &entry[1..];
            symbols.retain(|s| s != name);
        }
    }

    let mut deduped: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !deduped.contains(&symbol) {
            deduped.push(symbol);
        }
    }

    let symbols = deduped.join(";");
    SymbolResolution {
        changed: previous != symbols,
        symbols,
    }
}
