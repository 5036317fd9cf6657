//! Bootstrap schema. Integrity lives in the database: foreign keys cascade
//! and unique constraints back the registration rules.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        github_id TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        is_admin BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        alias TEXT NOT NULL UNIQUE,
        description TEXT,
        start_date DATETIME NOT NULL,
        end_date DATETIME NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        is_manager BOOLEAN NOT NULL DEFAULT 0,
        is_supervisor BOOLEAN NOT NULL DEFAULT 0,
        is_dementor BOOLEAN NOT NULL DEFAULT 0,
        UNIQUE (course_id, user_id),
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        course_id INTEGER NOT NULL,
        is_expelled BOOLEAN NOT NULL DEFAULT 0,
        total_score INTEGER NOT NULL DEFAULT 0,
        rank INTEGER,
        UNIQUE (user_id, course_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mentors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        course_id INTEGER NOT NULL,
        UNIQUE (user_id, course_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        student_start_date DATETIME,
        student_end_date DATETIME,
        cross_check_end_date DATETIME,
        cross_check_status TEXT NOT NULL DEFAULT 'initial',
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS task_interview_students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_date DATETIME NOT NULL,
        updated_date DATETIME NOT NULL,
        student_id INTEGER NOT NULL,
        course_id INTEGER,
        course_task_id INTEGER NOT NULL,
        UNIQUE (student_id, course_id, course_task_id),
        FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE,
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE,
        FOREIGN KEY (course_task_id) REFERENCES course_tasks(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_distributions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        description_url TEXT,
        start_date DATETIME NOT NULL,
        end_date DATETIME NOT NULL,
        min_team_size INTEGER NOT NULL DEFAULT 2,
        max_team_size INTEGER NOT NULL DEFAULT 4,
        strict_team_size INTEGER NOT NULL DEFAULT 3,
        strict_team_size_mode BOOLEAN NOT NULL DEFAULT 0,
        min_total_score INTEGER NOT NULL DEFAULT 0,
        created_date DATETIME NOT NULL,
        updated_date DATETIME NOT NULL,
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_distribution_students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_distribution_id INTEGER NOT NULL,
        student_id INTEGER NOT NULL,
        UNIQUE (team_distribution_id, student_id),
        FOREIGN KEY (team_distribution_id) REFERENCES team_distributions(id) ON DELETE CASCADE,
        FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_distribution_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        chat_link TEXT,
        FOREIGN KEY (team_distribution_id) REFERENCES team_distributions(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_students (
        team_id INTEGER NOT NULL,
        student_id INTEGER NOT NULL,
        PRIMARY KEY (team_id, student_id),
        FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE,
        FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_course_tasks_course_id ON course_tasks(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_course_tasks_cross_check_status ON course_tasks(cross_check_status)",
    "CREATE INDEX IF NOT EXISTS idx_team_distributions_course_id ON team_distributions(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_teams_team_distribution_id ON teams(team_distribution_id)",
    "CREATE INDEX IF NOT EXISTS idx_team_students_student_id ON team_students(student_id)",
];
