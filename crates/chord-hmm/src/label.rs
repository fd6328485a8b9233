//! Repair of chord label misprints found in annotation corpora.
//!
//! Not a grammar validator. Labels that match no known defect pass through
//! untouched and may later resolve to the unknown chord.

/// Known-bad tokens and their corrected spelling.
///
/// Every replacement already contains the quality separator and is not itself
/// a key, so normalizing twice changes nothing.
static OVERRIDES: &[(&str, &str)] = &[
    ("C:maj6(9", "C:maj6(9)"),
    ("D:7(#9", "D:7(#9)"),
    ("G:sus4(b7", "G:sus4(b7)"),
    ("E::min", "E:min"),
    ("A:min:", "A:min"),
    ("Bb:maj:", "Bb:maj"),
    ("F#min7/b7", "F#:min7/b7"),
    ("Dbmaj", "Db:maj"),
];

const SEPARATOR: char = ':';

/// Canonicalize a raw chord label.
///
/// Order: exact override, then the missing-separator repair (`Cmin` ->
/// `C:min`), else verbatim.
pub fn normalize(raw: &str) -> String {
    let label = raw.trim();

    if let Some((_, fixed)) = OVERRIDES.iter().find(|(bad, _)| *bad == label) {
        return (*fixed).to_string();
    }

    if !label.contains(SEPARATOR) {
        if let Some(pos) = label.find("min") {
            let mut fixed = String::with_capacity(label.len() + 1);
            fixed.push_str(&label[..pos]);
            fixed.push(SEPARATOR);
            fixed.push_str(&label[pos..]);
            return fixed;
        }
    }

    label.to_string()
}
