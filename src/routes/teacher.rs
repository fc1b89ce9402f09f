use super::{RouteNode, ViewId};

/// Teacher Layout Routes
///
/// The teacher workspace subtree: every leaf under this layout reads from the
/// same `WorkspaceCache` instance, mounted at the subtree root and torn down
/// with it. The "Classes" group is the portal's canonical accordion submenu.
pub fn teacher_routes() -> Vec<RouteNode> {
    vec![
        // /teacher/dashboard
        RouteNode::leaf(
            "/dashboard",
            "/teacher",
            "Dashboard",
            "home",
            ViewId::TeacherDashboard,
        ),
        // /teacher/classes/*: the classes submenu.
        RouteNode::group(
            "/classes",
            "/teacher",
            "Classes",
            "users",
            vec![
                // /teacher/classes/list
                RouteNode::leaf("/list", "", "My Classrooms", "list", ViewId::ClassroomList),
                // /teacher/classes/roster
                RouteNode::leaf("/roster", "", "Roster", "table", ViewId::ClassroomRoster),
            ],
        ),
        // /teacher/courses
        // Courses the teacher coordinates. Only rendered when the workspace's
        // is-coordinator flag is set; the route itself is always present.
        RouteNode::leaf(
            "/courses",
            "/teacher",
            "Coordinated Courses",
            "briefcase",
            ViewId::CoordinatedCourses,
        ),
        // /teacher/announcements
        RouteNode::leaf(
            "/announcements",
            "/teacher",
            "Announcements",
            "bell",
            ViewId::Announcements,
        ),
        // /teacher, default landing.
        RouteNode::redirect("", "/teacher", "/teacher/dashboard"),
    ]
}
