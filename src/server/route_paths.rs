//! Route paths, grouped by feature area.

/// Public OAuth consent flow.
pub mod auth {
    pub const START_AUTHENTICATION: &str = "/start_authentication";
    pub const PERSIST_REGISTRATION: &str = "/persist_registration";
}

/// Teacher courses, roster upload and export.
pub mod courses {
    pub const GET_MY_TEACHER_COURSES: &str = "/getMyTeacherCourses";
    pub const GET_MY_INACTIVE_TEACHER_COURSES: &str = "/getMyInactiveTeacherCourses";
    pub const POST_COURSE_STUDENTS: &str = "/courseStudents";
    pub const GET_COURSE_DATA_EXCEL: &str = "/courseDataExcel";
}

/// Course rosters, live or stored.
pub mod students {
    pub const GET_COURSE_STUDENTS: &str = "/getCourseStudents";
    pub const GET_STORED_COURSE_STUDENTS: &str = "/getStoredCourseStudents";
}

pub const HEALTH: &str = "/health";
