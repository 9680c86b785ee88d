use certflow::model::entity::{
    Course, CourseCreate, CourseModule, CourseModuleCreate, Question, QuestionCreate,
    QuestionType, Quiz, QuizCreate, QuizOption, QuizOptionCreate, UserEntity, UserEntityCreate,
};
use certflow::model::{CrudRepository, DbConnection, ModelManager};
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the course catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage students
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage course modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage quizzes, their questions and options
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        full_name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        instructor: String,
        #[arg(long, default_value = "beginner")]
        level: String,
        #[arg(long, default_value_t = 0)]
        duration_hours: i32,
    },
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        course_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        video_url: String,
        #[arg(long, default_value_t = 0)]
        duration_seconds: i32,
        /// Appended after the last module when omitted
        #[arg(long)]
        position: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Add {
        #[arg(long)]
        module_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 70)]
        passing_score: i32,
        #[arg(long, default_value_t = 3)]
        max_attempts: i32,
    },
    AddQuestion {
        #[arg(long)]
        quiz_id: Uuid,
        #[arg(long)]
        text: String,
        /// multiple_choice, true_false or short_answer
        #[arg(long, value_parser = parse_question_type)]
        question_type: QuestionType,
        #[arg(long, default_value_t = 0)]
        position: i32,
    },
    AddOption {
        #[arg(long)]
        question_id: Uuid,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

fn parse_question_type(s: &str) -> Result<QuestionType, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> certflow::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL is not set");
        std::process::exit(1);
    };

    let db_con = DbConnection::connect(&database_url)?;
    let mm = ModelManager::new(db_con);
    let mut conn = mm.acquire().await?;

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { username, password, full_name } => {
                let user = UserEntity::create(
                    &mut conn,
                    UserEntityCreate {
                        username,
                        full_name,
                        password_hash: certflow::auth::hash_password(&password)?,
                    },
                )
                .await?;
                println!("User created: {}", user.id());
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add { title, description, instructor, level, duration_hours } => {
                let course = Course::create(
                    &mut conn,
                    CourseCreate {
                        title,
                        description,
                        instructor,
                        level,
                        duration_hours,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
            CourseCommands::List { limit, offset } => {
                for course in Course::list(&mut conn, limit, offset).await? {
                    println!("{}\t{}\t{}", course.id(), course.title(), course.instructor());
                }
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add { course_id, title, video_url, duration_seconds, position } => {
                let module = CourseModule::create(
                    &mut conn,
                    CourseModuleCreate {
                        course_id,
                        title,
                        position,
                        video_url,
                        duration_seconds,
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Add { module_id, title, passing_score, max_attempts } => {
                let quiz = Quiz::create(
                    &mut conn,
                    QuizCreate {
                        module_id,
                        title,
                        passing_score,
                        max_attempts,
                    },
                )
                .await?;
                println!("Quiz created: {:?}", quiz);
            }
            QuizCommands::AddQuestion { quiz_id, text, question_type, position } => {
                let question = Question::create(
                    &mut conn,
                    QuestionCreate {
                        quiz_id,
                        text,
                        question_type,
                        position,
                    },
                )
                .await?;
                println!("Question created: {:?}", question);
            }
            QuizCommands::AddOption { question_id, text, is_correct } => {
                let option = QuizOption::create(
                    &mut conn,
                    QuizOptionCreate {
                        question_id,
                        text,
                        is_correct,
                    },
                )
                .await?;
                println!("Option created: {:?}", option);
            }
        },
    }

    Ok(())
}
