//! Which two engines to compare in speedup charts and the summary
//! table.

use anyhow::{Result, bail};
use kstring::KString;

/// Preferred baseline engine when none is given and it is present.
pub const DEFAULT_BASELINE: &str = "rocksdb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Numerator of speedups
    pub subject: KString,
    /// Denominator of speedups
    pub baseline: KString,
}

impl Comparison {
    /// Choose subject and baseline among `engines` (normalized
    /// names). Given names must be present. Without names, the
    /// baseline is `DEFAULT_BASELINE` if present, else the first
    /// engine, and the subject is the first other engine. Returns
    /// None if there are fewer than two engines to choose from.
    pub fn choose(
        engines: &[KString],
        subject: Option<&str>,
        baseline: Option<&str>,
    ) -> Result<Option<Self>> {
        let find = |name: &str, role: &str| -> Result<KString> {
            let name = name.trim().to_lowercase();
            match engines.iter().find(|e| e.as_str() == name) {
                Some(engine) => Ok(engine.clone()),
                None => bail!(
                    "{role} engine {name:?} not found in the data, engines present: {:?}",
                    engines.iter().map(|e| e.as_str()).collect::<Vec<_>>()
                ),
            }
        };
        let subject = subject.map(|s| find(s, "subject")).transpose()?;
        let baseline = baseline.map(|s| find(s, "baseline")).transpose()?;

        let first_other = |other: Option<&KString>| -> Option<KString> {
            engines.iter().find(|e| Some(*e) != other).cloned()
        };

        let baseline = match baseline {
            Some(b) => Some(b),
            None => engines
                .iter()
                .find(|e| e.as_str() == DEFAULT_BASELINE && Some(*e) != subject.as_ref())
                .cloned()
                .or_else(|| first_other(subject.as_ref())),
        };
        let Some(baseline) = baseline else {
            return Ok(None);
        };
        let subject = match subject {
            Some(s) => s,
            None => match first_other(Some(&baseline)) {
                Some(s) => s,
                None => return Ok(None),
            },
        };
        if subject == baseline {
            bail!("subject and baseline engine are both {subject:?}")
        }
        Ok(Some(Comparison { subject, baseline }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engines(names: &[&'static str]) -> Vec<KString> {
        names.iter().map(|n| KString::from_static(n)).collect()
    }

    fn pair(c: Option<Comparison>) -> Option<(String, String)> {
        c.map(|c| (c.subject.to_string(), c.baseline.to_string()))
    }

    #[test]
    fn t_defaults() -> Result<()> {
        let e = engines(&["rocksdb", "tidesdb"]);
        assert_eq!(
            pair(Comparison::choose(&e, None, None)?),
            Some(("tidesdb".into(), "rocksdb".into()))
        );
        let e = engines(&["a", "b", "c"]);
        assert_eq!(
            pair(Comparison::choose(&e, None, None)?),
            Some(("b".into(), "a".into()))
        );
        assert_eq!(pair(Comparison::choose(&engines(&["a"]), None, None)?), None);
        Ok(())
    }

    #[test]
    fn t_given() -> Result<()> {
        let e = engines(&["rocksdb", "tidesdb"]);
        assert_eq!(
            pair(Comparison::choose(&e, Some("RocksDB"), None)?),
            Some(("rocksdb".into(), "tidesdb".into()))
        );
        assert_eq!(
            pair(Comparison::choose(&e, None, Some("tidesdb"))?),
            Some(("rocksdb".into(), "tidesdb".into()))
        );
        assert!(Comparison::choose(&e, Some("lmdb"), None).is_err());
        assert!(Comparison::choose(&e, Some("tidesdb"), Some("tidesdb")).is_err());
        Ok(())
    }
}
