//! 百分制到等级、绩点与加权 GPA 的换算

use crate::models::grades::entities::{CourseScoreTotals, Transcript, TranscriptRow};

/// 等级下限（含），从高到低
const LETTER_BANDS: [(f64, &str); 9] = [
    (90.0, "A"),
    (85.0, "A-"),
    (80.0, "B+"),
    (75.0, "B"),
    (70.0, "B-"),
    (65.0, "C+"),
    (60.0, "C"),
    (55.0, "C-"),
    (50.0, "D"),
];

pub fn letter_for_percentage(percentage: f64) -> &'static str {
    if !percentage.is_finite() || percentage < 0.0 {
        return "F";
    }
    LETTER_BANDS
        .iter()
        .find(|(lower, _)| percentage >= *lower)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

pub fn gpa_points(letter: &str) -> f64 {
    match letter {
        "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D" => 1.0,
        _ => 0.0,
    }
}

/// Σ(绩点 × 学分) / Σ学分，保留两位小数；总学分为 0 时返回 0
pub fn weighted_gpa(rows: &[TranscriptRow]) -> f64 {
    let credits: i64 = rows.iter().map(|r| i64::from(r.credits.max(0))).sum();
    if credits == 0 {
        return 0.0;
    }
    let weighted: f64 = rows
        .iter()
        .map(|r| r.points * f64::from(r.credits.max(0)))
        .sum();
    round2(weighted / credits as f64)
}

pub fn transcript_row(totals: CourseScoreTotals) -> Option<TranscriptRow> {
    // 没有已评分作业的课程不计入
    if totals.points_sum <= 0.0 {
        return None;
    }
    // 等级按未取整的百分比判定，只有展示值取两位小数
    let raw = totals.score_sum / totals.points_sum * 100.0;
    let letter = letter_for_percentage(raw);
    let percentage = round2(raw);
    Some(TranscriptRow {
        course_id: totals.course_id,
        code: totals.code,
        title: totals.title,
        credits: totals.credits,
        percentage,
        letter: letter.to_string(),
        points: gpa_points(letter),
    })
}

pub fn build_transcript(student_id: i64, totals: Vec<CourseScoreTotals>) -> Transcript {
    let rows: Vec<TranscriptRow> = totals.into_iter().filter_map(transcript_row).collect();
    Transcript {
        student_id,
        gpa: weighted_gpa(&rows),
        total_credits: rows.iter().map(|r| r.credits).sum(),
        rows,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(percentage: f64, credits: i32) -> TranscriptRow {
        let letter = letter_for_percentage(percentage);
        TranscriptRow {
            course_id: 0,
            code: String::new(),
            title: String::new(),
            credits,
            percentage,
            letter: letter.to_string(),
            points: gpa_points(letter),
        }
    }

    fn totals(course_id: i64, score: f64, points: f64, credits: i32) -> CourseScoreTotals {
        CourseScoreTotals {
            course_id,
            code: format!("C{course_id}"),
            title: format!("Course {course_id}"),
            credits,
            score_sum: score,
            points_sum: points,
        }
    }

    #[test]
    fn test_letter_boundaries() {
        assert_eq!(letter_for_percentage(90.0), "A");
        assert_eq!(letter_for_percentage(89.9), "A-");
        assert_eq!(letter_for_percentage(85.0), "A-");
        assert_eq!(letter_for_percentage(80.0), "B+");
        assert_eq!(letter_for_percentage(74.99), "B-");
        assert_eq!(letter_for_percentage(60.0), "C");
        assert_eq!(letter_for_percentage(50.0), "D");
        assert_eq!(letter_for_percentage(49.99), "F");
        assert_eq!(letter_for_percentage(120.0), "A");
    }

    #[test]
    fn test_letter_invalid_input() {
        assert_eq!(letter_for_percentage(-1.0), "F");
        assert_eq!(letter_for_percentage(f64::NAN), "F");
        assert_eq!(letter_for_percentage(f64::INFINITY), "F");
    }

    #[test]
    fn test_gpa_points() {
        assert_eq!(gpa_points("A"), 4.0);
        assert_eq!(gpa_points("B+"), 3.3);
        assert_eq!(gpa_points("C-"), 1.7);
        assert_eq!(gpa_points("F"), 0.0);
        assert_eq!(gpa_points("Z"), 0.0);
    }

    #[test]
    fn test_weighted_gpa_known_table() {
        // (4.0*3 + 3.3*4 + 2.7*3) / 10 = 3.33
        let rows = vec![row(92.0, 3), row(84.0, 4), row(71.0, 3)];
        assert_eq!(weighted_gpa(&rows), 3.33);
    }

    #[test]
    fn test_weighted_gpa_without_credits() {
        assert_eq!(weighted_gpa(&[]), 0.0);
        assert_eq!(weighted_gpa(&[row(95.0, 0)]), 0.0);
    }

    #[test]
    fn test_build_transcript_skips_ungraded_courses() {
        let transcript = build_transcript(
            5,
            vec![
                totals(1, 46.0, 50.0, 3),
                totals(2, 0.0, 0.0, 4),
                totals(3, 43.0, 50.0, 4),
            ],
        );
        assert_eq!(transcript.student_id, 5);
        assert_eq!(transcript.rows.len(), 2);
        assert_eq!(transcript.rows[0].percentage, 92.0);
        assert_eq!(transcript.rows[0].letter, "A");
        assert_eq!(transcript.rows[1].letter, "A-");
        assert_eq!(transcript.total_credits, 7);
        // (4.0*3 + 3.7*4) / 7 = 3.828..
        assert_eq!(transcript.gpa, 3.83);
    }

    #[test]
    fn test_letter_uses_unrounded_percentage() {
        // 89.996% 显示为 90，但未达到 A 的下限
        let transcript = build_transcript(1, vec![totals(1, 899.96, 1000.0, 3)]);
        let row = &transcript.rows[0];
        assert_eq!(row.percentage, 90.0);
        assert_eq!(row.letter, "A-");
        assert_eq!(row.points, 3.7);
    }
}
