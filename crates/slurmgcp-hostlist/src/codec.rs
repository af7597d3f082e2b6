//! Hostlist compression and expansion.
//!
//! Compression behaves like `scontrol show hostlistsorted`: input
//! order is not preserved, duplicates collapse, and output terms are sorted
//! by prefix.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::error::{HostlistError, HostlistResult};

/// Upper bound on the number of names a single term may expand to.
pub const MAX_EXPANSION: usize = 1 << 20;

/// Names sharing one alphanumeric prefix.
#[derive(Default)]
struct PrefixGroup {
    /// The prefix itself is also a name (no numeric suffix).
    bare: bool,
    /// Suffix width → numeric values seen at that width.
    by_width: BTreeMap<usize, BTreeSet<u64>>,
}

/// Compress node names into hostlist notation.
///
/// Blank entries are ignored. Names are grouped by the text before their
/// trailing digits, then by the digit count, so `n-8` and `n-08` land in
/// separate runs: `["n-08", "n-09", "n-8", "n-9"]` → `n-[8-9,08-09]`.
pub fn to_hostlist<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: BTreeMap<String, PrefixGroup> = BTreeMap::new();

    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        let (prefix, digits) = split_numeric_suffix(name);
        match digits.parse::<u64>() {
            Ok(n) if !digits.is_empty() => {
                groups
                    .entry(prefix.to_string())
                    .or_default()
                    .by_width
                    .entry(digits.len())
                    .or_default()
                    .insert(n);
            }
            // No suffix, or one too long to be an index: keep the name whole.
            _ => groups.entry(name.to_string()).or_default().bare = true,
        }
    }

    let mut terms = Vec::new();
    for (prefix, group) in &groups {
        if group.bare {
            terms.push(prefix.clone());
        }
        let runs: Vec<String> = group
            .by_width
            .iter()
            .flat_map(|(width, values)| compress_runs(values, *width))
            .collect();
        match runs.as_slice() {
            [] => {}
            [single] if !single.contains('-') => terms.push(format!("{prefix}{single}")),
            _ => terms.push(format!("{prefix}[{}]", runs.join(","))),
        }
    }
    terms.join(",")
}

/// Hostlist of `<prefix><i>` for every unpadded index in `indices`.
///
/// Produces the same text as `to_hostlist` over the enumerated names without
/// allocating one name per index. Runs are split at decimal width
/// boundaries, as `to_hostlist` groups them.
pub fn range_to_hostlist(prefix: &str, indices: Range<u64>) -> String {
    let mut runs = Vec::new();
    let mut start = indices.start;
    while start < indices.end {
        let width = decimal_width(start);
        let width_end = 10u64
            .checked_pow(width as u32)
            .map_or(indices.end, |next| next.min(indices.end));
        runs.push(render_run(start, width_end - 1, |n| n.to_string()));
        start = width_end;
    }
    match runs.as_slice() {
        [] => String::new(),
        [single] if !single.contains('-') => format!("{prefix}{single}"),
        _ => format!("{prefix}[{}]", runs.join(",")),
    }
}

fn decimal_width(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Expand a hostlist expression into the literal names it denotes.
///
/// Terms are separated by commas outside of brackets. A bracket holds a
/// comma list of `a-b` ranges or single values; the digit count of `a` sets
/// the zero-padding of the whole range. Text after a bracket is appended to
/// every generated name and may itself contain brackets.
pub fn expand(hostlist: &str) -> HostlistResult<Vec<String>> {
    let mut names = Vec::new();
    for term in split_terms(hostlist)? {
        let expanded = expand_term(term)?;
        if expanded.len() > MAX_EXPANSION {
            return Err(HostlistError::TooLarge {
                term: term.to_string(),
                limit: MAX_EXPANSION,
            });
        }
        names.extend(expanded);
    }
    Ok(names)
}

/// Split `name` into (prefix, trailing ASCII digits).
fn split_numeric_suffix(name: &str) -> (&str, &str) {
    let cut = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(name.len(), |(i, _)| i);
    name.split_at(cut)
}

/// Fold sorted values into `start-end` runs and bare singletons.
fn compress_runs(values: &BTreeSet<u64>, width: usize) -> Vec<String> {
    let fmt = |n: u64| format!("{n:0width$}");
    let mut runs = Vec::new();
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return runs;
    };

    let (mut start, mut end) = (first, first);
    for n in iter {
        if end.checked_add(1) == Some(n) {
            end = n;
            continue;
        }
        runs.push(render_run(start, end, fmt));
        start = n;
        end = n;
    }
    runs.push(render_run(start, end, fmt));
    runs
}

fn render_run(start: u64, end: u64, fmt: impl Fn(u64) -> String) -> String {
    if start == end {
        fmt(start)
    } else {
        format!("{}-{}", fmt(start), fmt(end))
    }
}

/// Split on commas that are not inside brackets, dropping blank terms.
fn split_terms(hostlist: &str) -> HostlistResult<Vec<&str>> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in hostlist.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| HostlistError::UnbalancedBracket(hostlist.to_string()))?;
            }
            ',' if depth == 0 => {
                terms.push(&hostlist[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(HostlistError::UnbalancedBracket(hostlist.to_string()));
    }
    terms.push(&hostlist[start..]);
    Ok(terms.into_iter().map(str::trim).filter(|t| !t.is_empty()).collect())
}

fn expand_term(term: &str) -> HostlistResult<Vec<String>> {
    let Some(open) = term.find('[') else {
        if term.contains(']') {
            return Err(HostlistError::UnbalancedBracket(term.to_string()));
        }
        return Ok(vec![term.to_string()]);
    };
    let close = term[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| HostlistError::UnbalancedBracket(term.to_string()))?;

    let prefix = &term[..open];
    let body = &term[open + 1..close];
    if prefix.contains(']') || body.contains('[') {
        return Err(HostlistError::UnbalancedBracket(term.to_string()));
    }
    let values = expand_range_list(term, body)?;
    let rests = expand_term(&term[close + 1..])?;

    let total = values.len().saturating_mul(rests.len());
    if total > MAX_EXPANSION {
        return Err(HostlistError::TooLarge {
            term: term.to_string(),
            limit: MAX_EXPANSION,
        });
    }

    let mut names = Vec::with_capacity(total);
    for value in &values {
        for rest in &rests {
            names.push(format!("{prefix}{value}{rest}"));
        }
    }
    Ok(names)
}

fn expand_range_list(term: &str, body: &str) -> HostlistResult<Vec<String>> {
    if body.trim().is_empty() {
        return Err(HostlistError::EmptyRange(term.to_string()));
    }
    let invalid = |range: &str| HostlistError::InvalidRange {
        term: term.to_string(),
        range: range.to_string(),
    };
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let mut values = Vec::new();
    for range in body.split(',').map(str::trim) {
        match range.split_once('-') {
            None if is_number(range) => values.push(range.to_string()),
            Some((lo, hi)) if is_number(lo) && is_number(hi) => {
                let a: u64 = lo.parse().map_err(|_| invalid(range))?;
                let b: u64 = hi.parse().map_err(|_| invalid(range))?;
                if b < a {
                    return Err(invalid(range));
                }
                if (b - a) as usize >= MAX_EXPANSION {
                    return Err(HostlistError::TooLarge {
                        term: term.to_string(),
                        limit: MAX_EXPANSION,
                    });
                }
                let width = lo.len();
                values.extend((a..=b).map(|n| format!("{n:0width$}")));
            }
            _ => return Err(invalid(range)),
        }
    }
    Ok(values)
}
