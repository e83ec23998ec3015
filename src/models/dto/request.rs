use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 50, message = "Username is required"),
        does_not_contain(pattern = "@", message = "Username cannot contain '@'")
    )]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address or username.
    #[validate(length(min = 1, max = 254, message = "Email or username is required"))]
    pub identifier: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Please enter a question"))]
    pub text: String,

    #[validate(length(equal = 4, message = "Exactly four options are required"))]
    pub options: Vec<String>,

    #[validate(range(max = 3, message = "Please select the correct answer"))]
    pub correct_option_index: u8,
}

impl RegisterRequest {
    /// Copies the fields with surrounding whitespace removed. The password is kept verbatim.
    pub fn trimmed(&self) -> Self {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

impl CreateCourseRequest {
    pub fn trimmed(&self) -> Self {
        CreateCourseRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}
