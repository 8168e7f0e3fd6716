use std::collections::HashSet;
use std::hash::Hash;

/// 把订阅期间收到的记录合并进已有列表
///
/// `incoming` 按到达顺序排列（旧在前）。未出现过的记录以新在前的顺序
/// 放到列表头部；已有记录全部保留，按 `key` 去重。
pub fn merge_incoming<T, K, F>(existing: Vec<T>, incoming: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = existing.iter().map(&key).collect();
    let mut fresh: Vec<T> = incoming
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect();
    fresh.reverse();
    fresh.extend(existing);
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_new_records_newest_first() {
        let merged = merge_incoming(vec![3, 2, 1], vec![4, 5], |x| *x);
        assert_eq!(merged, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_never_duplicates_or_drops() {
        let merged = merge_incoming(vec![3, 2, 1], vec![2, 4, 4, 3], |x| *x);
        assert_eq!(merged, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(merge_incoming(Vec::<i32>::new(), vec![], |x| *x), Vec::<i32>::new());
        assert_eq!(merge_incoming(vec![1], vec![], |x| *x), vec![1]);
        assert_eq!(merge_incoming(vec![], vec![1, 2], |x| *x), vec![2, 1]);
    }

    #[test]
    fn test_keyed_by_id_field() {
        let existing = vec![(1, "old")];
        let merged = merge_incoming(existing, vec![(1, "dup"), (2, "new")], |(id, _)| *id);
        assert_eq!(merged, vec![(2, "new"), (1, "old")]);
    }
}
