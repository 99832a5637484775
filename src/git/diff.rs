// Git diff 统计解析

use crate::types::DiffFileStat;

/// 解析 `git diff --numstat -z` 输出
///
/// Paths arrive unquoted, so non-ASCII names survive intact. A rename is
/// emitted as `added<TAB>deleted<TAB><NUL>old<NUL>new<NUL>` and recorded under
/// its new path. Binary files report `-` for both counts and are recorded as zero.
pub fn parse_numstat(output: &str) -> Vec<DiffFileStat> {
    let mut fields = output.split('\0');
    let mut stats = Vec::new();

    while let Some(record) = fields.next() {
        let record = record.trim_start_matches('\n');
        let mut parts = record.splitn(3, '\t');
        let (Some(insertions), Some(deletions), Some(path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let path = if path.is_empty() {
            // rename: pre-image then post-image
            let _old = fields.next();
            match fields.next() {
                Some(new) => new,
                None => continue,
            }
        } else {
            path
        };

        if path.is_empty() {
            continue;
        }
        stats.push(DiffFileStat::new(
            path,
            parse_count(insertions),
            parse_count(deletions),
        ));
    }

    stats
}

fn parse_count(field: &str) -> u64 {
    field.trim().parse().unwrap_or(0)
}
