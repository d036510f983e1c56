//! Photo list handling for the `fotos` column.
//!
//! A listing owns an ordered list of photo references: either bare filenames
//! under the upload directory or absolute URLs on the remote image host. The
//! database stores the list as a single comma-joined text field; that encoding
//! lives entirely in [`PhotoList::decode`] and [`PhotoList::encode`], callers
//! only ever see the list form.

/// Ordered, duplicate-free list of photo references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoList {
    entries: Vec<String>,
}

impl PhotoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored comma-joined form. Tokens are trimmed and empty
    /// tokens dropped, so `"a, b,,c "` and `"a,b,c"` decode identically.
    pub fn decode(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Decode straight from the nullable database column.
    pub fn from_column(raw: Option<&str>) -> Self {
        raw.map(Self::decode).unwrap_or_default()
    }

    /// Serialize back to the stored form, preserving order.
    pub fn encode(&self) -> String {
        self.entries.join(",")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// References that point at a remote host rather than a local file.
    /// Anything with a scheme marker must never be re-read as a filename.
    pub fn is_remote(entry: &str) -> bool {
        entry.starts_with("http")
    }

    /// References stored as local filenames.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|e| !Self::is_remote(e))
    }

    /// Append references that are not already present. Whitespace is trimmed
    /// and blank tokens ignored; duplicates compare by exact string.
    pub fn append<I>(&mut self, novas: I)
    where
        I: IntoIterator<Item = String>,
    {
        for nova in novas {
            let nova = nova.trim();
            if nova.is_empty() {
                continue;
            }
            if !self.entries.iter().any(|e| e == nova) {
                self.entries.push(nova.to_string());
            }
        }
    }

    /// Remove the entries at the given 1-based positions.
    ///
    /// Indices are applied in descending order so earlier removals never
    /// shift the meaning of later ones. Out-of-range indices are skipped and
    /// returned so the caller can report them.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<usize> {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut invalid = Vec::new();
        for &idx in ordered.iter().rev() {
            if idx >= 1 && idx <= self.entries.len() {
                self.entries.remove(idx - 1);
            } else {
                invalid.push(idx);
            }
        }
        invalid.reverse();
        invalid
    }

    /// Remove every entry whose exact value appears in `names`.
    pub fn remove_by_value(&mut self, names: &[&str]) {
        self.entries.retain(|e| !names.contains(&e.as_str()));
    }
}

impl FromIterator<String> for PhotoList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut list = Self::new();
        list.append(iter);
        list
    }
}
