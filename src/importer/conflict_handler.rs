// ==========================================
// 商品目录导入 - 重复名称判定
// ==========================================
// 规则（按顺序）:
// 1. 商品库中已存在（忽略大小写） → RejectedExists
// 2. 本批次较早行已接受同名商品   → RejectedInFile
// 3. 否则接受，并记入本批次
// ==========================================

use crate::domain::product::name_key;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    RejectedExists,
    RejectedInFile,
}

/// 单批次去重闸门
///
/// `existing` 为批次开始时的存储快照，批次内不再刷新
#[derive(Debug, Default)]
pub struct DedupGate {
    existing: HashSet<String>,
    seen: HashSet<String>,
}

impl DedupGate {
    pub fn new(existing: HashSet<String>) -> Self {
        Self {
            existing,
            seen: HashSet::new(),
        }
    }

    pub fn admit(&mut self, name: &str) -> Admission {
        let key = name_key(name);
        if self.existing.contains(&key) {
            return Admission::RejectedExists;
        }
        if !self.seen.insert(key) {
            return Admission::RejectedInFile;
        }
        Admission::Accepted
    }

    /// 本批次已接受的名称数
    pub fn accepted_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_duplicate_ignores_case() {
        let mut gate = DedupGate::default();
        assert_eq!(gate.admit("Game A"), Admission::Accepted);
        assert_eq!(gate.admit("game a"), Admission::RejectedInFile);
        assert_eq!(gate.admit("Game B"), Admission::Accepted);
        assert_eq!(gate.accepted_count(), 2);
    }

    #[test]
    fn test_existing_takes_precedence() {
        let existing: HashSet<String> = ["halo".to_string()].into_iter().collect();
        let mut gate = DedupGate::new(existing);

        assert_eq!(gate.admit("HALO"), Admission::RejectedExists);
        assert_eq!(gate.admit("Halo"), Admission::RejectedExists);
        assert_eq!(gate.accepted_count(), 0);
    }
}
