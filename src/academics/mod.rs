//! 学业数据的纯计算部分：出勤汇总、成绩展示名称、分数校验

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::AppError;

/// 未设置满分时的默认值
pub const DEFAULT_MAX_MARKS: i32 = 100;

/// 仪表盘最多展示的成绩条数
pub const DASHBOARD_RESULT_LIMIT: u64 = 50;

const UNKNOWN_SUBJECT: &str = "Unknown Subject";
const GENERAL_SUBJECT: &str = "General";

/// 分配给班级的测验
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedTest {
    pub qp_id: i32,
    pub title: String,
    pub subject_name: Option<String>,
}

/// 一条出勤记录（已关联科目名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMark {
    pub subject_name: Option<String>,
    pub status: Option<String>,
}

/// 按科目汇总的出勤
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub subject: String,
    pub present: u32,
    pub total: u32,
    pub percent: f64,
}

/// 一条成绩记录（已关联试卷和科目）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub qp_id: Option<i32>,
    pub paper_title: Option<String>,
    pub subject_name: Option<String>,
    pub marks: Option<i32>,
    pub max_marks: Option<i32>,
    pub recorded_at: Option<NaiveDateTime>,
}

/// 返回给学生的成绩行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub subject: String,
    pub test: String,
    pub marks: Option<i32>,
    pub max_marks: i32,
    pub recorded_at: Option<NaiveDateTime>,
}

/// 老师录入的成绩
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IaResultEntry {
    pub student_id: i32,
    pub qp_id: i32,
    pub marks: i32,
    #[serde(default)]
    pub max_marks: Option<i32>,
}

/// 单个学生的出勤标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: i32,
    pub present: bool,
}

/// 出勤状态是否算"到"
///
/// 历史数据里混有 `1` / `present` / `P` / `p` 几种写法。
pub fn is_present(status: &str) -> bool {
    matches!(status, "1" | "present" | "P" | "p")
}

/// 写入数据库的出勤状态
pub fn status_label(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}

/// 按科目汇总出勤，按科目名排序
pub fn summarize_attendance(marks: &[AttendanceMark]) -> Vec<AttendanceSummary> {
    let mut by_subject: BTreeMap<&str, (u32, u32)> = BTreeMap::new();

    for mark in marks {
        let subject = mark.subject_name.as_deref().unwrap_or(UNKNOWN_SUBJECT);
        let counts = by_subject.entry(subject).or_default();
        if mark.status.as_deref().is_some_and(is_present) {
            counts.0 += 1;
        }
        counts.1 += 1;
    }

    by_subject
        .into_iter()
        .map(|(subject, (present, total))| AttendanceSummary {
            subject: subject.to_string(),
            present,
            total,
            percent: percent(present, total),
        })
        .collect()
}

/// 百分比，保留两位小数
pub fn percent(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(present) / f64::from(total) * 100.0;
    (raw * 100.0).round() / 100.0
}

impl ResultRecord {
    /// 补全展示名称：科目缺失显示 General，试卷已删除显示其 id
    pub fn into_view(self) -> ResultView {
        let test = match (self.paper_title, self.qp_id) {
            (Some(title), _) => title,
            (None, Some(id)) => format!("Deleted Paper (ID:{})", id),
            (None, None) => "Deleted Paper".to_string(),
        };

        ResultView {
            subject: self
                .subject_name
                .unwrap_or_else(|| GENERAL_SUBJECT.to_string()),
            test,
            marks: self.marks,
            max_marks: self.max_marks.unwrap_or(DEFAULT_MAX_MARKS),
            recorded_at: self.recorded_at,
        }
    }
}

/// 校验分数，返回实际使用的满分
///
/// 满分缺省或为 0 时取 100。
pub fn validate_marks(marks: i32, max_marks: Option<i32>) -> Result<i32, AppError> {
    let max = match max_marks {
        None | Some(0) => DEFAULT_MAX_MARKS,
        Some(m) if m < 0 => {
            return Err(AppError::BadRequest("max_marks must be positive".into()));
        }
        Some(m) => m,
    };

    if !(0..=max).contains(&marks) {
        return Err(AppError::BadRequest(format!(
            "marks must be between 0 and {}",
            max
        )));
    }

    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(subject: Option<&str>, status: &str) -> AttendanceMark {
        AttendanceMark {
            subject_name: subject.map(str::to_string),
            status: Some(status.to_string()),
        }
    }

    #[test]
    fn test_present_spellings() {
        for status in ["1", "present", "P", "p"] {
            assert!(is_present(status), "{status} should count as present");
        }
        for status in ["0", "absent", "A", "Present ", ""] {
            assert!(!is_present(status), "{status} should not count");
        }
    }

    #[test]
    fn test_summary_groups_and_rounds() {
        let marks = vec![
            mark(Some("Physics"), "P"),
            mark(Some("Physics"), "absent"),
            mark(Some("Physics"), "1"),
            mark(Some("Maths"), "present"),
            mark(None, "p"),
            AttendanceMark {
                subject_name: Some("Maths".into()),
                status: None,
            },
        ];

        let summary = summarize_attendance(&marks);
        assert_eq!(summary.len(), 3);

        assert_eq!(summary[0].subject, "Maths");
        assert_eq!((summary[0].present, summary[0].total), (1, 2));
        assert_eq!(summary[0].percent, 50.0);

        assert_eq!(summary[1].subject, "Physics");
        assert_eq!((summary[1].present, summary[1].total), (2, 3));
        assert_eq!(summary[1].percent, 66.67);

        assert_eq!(summary[2].subject, "Unknown Subject");
        assert_eq!(summary[2].percent, 100.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(summarize_attendance(&[]).is_empty());
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_result_view_fallbacks() {
        let view = ResultRecord {
            qp_id: Some(42),
            paper_title: None,
            subject_name: None,
            marks: Some(18),
            max_marks: None,
            recorded_at: None,
        }
        .into_view();

        assert_eq!(view.subject, "General");
        assert_eq!(view.test, "Deleted Paper (ID:42)");
        assert_eq!(view.max_marks, 100);
    }

    #[test]
    fn test_result_view_keeps_names() {
        let view = ResultRecord {
            qp_id: Some(1),
            paper_title: Some("IA-1".into()),
            subject_name: Some("Data Structures".into()),
            marks: Some(22),
            max_marks: Some(25),
            recorded_at: None,
        }
        .into_view();

        assert_eq!(view.subject, "Data Structures");
        assert_eq!(view.test, "IA-1");
        assert_eq!(view.max_marks, 25);
    }

    #[test]
    fn test_validate_marks() {
        assert_eq!(validate_marks(40, None).unwrap(), 100);
        assert_eq!(validate_marks(40, Some(0)).unwrap(), 100);
        assert_eq!(validate_marks(25, Some(25)).unwrap(), 25);
        assert_eq!(validate_marks(0, Some(25)).unwrap(), 25);
        assert!(validate_marks(26, Some(25)).is_err());
        assert!(validate_marks(-1, None).is_err());
        assert!(validate_marks(10, Some(-5)).is_err());
    }
}
