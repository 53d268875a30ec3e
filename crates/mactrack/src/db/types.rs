/// Database types for requisite data

#[derive(Debug, Clone)]
pub struct DbRequisite {
    pub requisite_id: i64,
    pub subject: String,
    pub course_number: String,
    pub req_subject: String,
    pub req_course_number: String,
    pub kind: String,
    pub note: Option<String>,
}
