// This file is part of Massbridge.
//
// Massbridge is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Massbridge is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Massbridge.
// If not, see https://www.gnu.org/licenses/.

use std::{fs, path::Path};

use anyhow::Context;
use secrecy::SecretString;

/// Load private keys from a file with one hex key per line. Blank lines and
/// lines starting with `#` are skipped.
pub(crate) fn load_private_keys(path: &Path) -> anyhow::Result<Vec<SecretString>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read private keys from {}", path.display()))?;
    Ok(parse_private_keys(&contents))
}

fn parse_private_keys(contents: &str) -> Vec<SecretString> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| SecretString::from(line.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let contents = "\
# funding wallets
1111111111111111111111111111111111111111111111111111111111111111

  2222222222222222222222222222222222222222222222222222222222222222
#3333333333333333333333333333333333333333333333333333333333333333
";
        let keys = parse_private_keys(contents);
        assert_eq!(keys.len(), 2);
        assert_eq!(
            keys[0].expose_secret(),
            "1111111111111111111111111111111111111111111111111111111111111111"
        );
        assert_eq!(
            keys[1].expose_secret(),
            "2222222222222222222222222222222222222222222222222222222222222222"
        );
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(parse_private_keys("").is_empty());
    }
}
