use super::{RouteNode, ViewId};

/// Student Layout Routes
///
/// Flat layout: every entry is a top-level leaf, so nothing in this tree ever
/// appears in the accordion state. All leaves are behind the session gate.
pub fn student_routes() -> Vec<RouteNode> {
    vec![
        // /student/dashboard
        RouteNode::leaf(
            "/dashboard",
            "/student",
            "Dashboard",
            "home",
            ViewId::StudentDashboard,
        ),
        // /student/record
        // Academic record: grades and attendance for the signed-in student.
        RouteNode::leaf(
            "/record",
            "/student",
            "Academic Record",
            "book",
            ViewId::AcademicRecord,
        ),
        // /student/announcements
        RouteNode::leaf(
            "/announcements",
            "/student",
            "Announcements",
            "bell",
            ViewId::Announcements,
        ),
        // /student/challenge
        // Weekly challenge leaderboard.
        RouteNode::leaf(
            "/challenge",
            "/student",
            "Challenge",
            "trophy",
            ViewId::ChallengeLeaderboard,
        ),
        // /student, default landing for the bare layout path.
        RouteNode::redirect("", "/student", "/student/dashboard"),
    ]
}
