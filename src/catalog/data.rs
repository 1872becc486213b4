//! The reference question set.

use super::model::{PathType, Question};

pub(super) fn qualifier() -> Question {
    Question::new(
        "qualifier",
        "Which of the following best describes your vision situation?",
        &[
            ("Laser Eye Surgery", "LaserEye"),
            ("Cloudy/Blurred Vision", "Cataract"),
            ("Itchy/Dry Eyes", "DryEye"),
            ("Contact Lens Consultation", "ContactLens"),
        ],
    )
}

pub(super) fn path_questions(path: PathType) -> Vec<Question> {
    match path {
        PathType::LaserEye => laser_eye(),
        PathType::Cataract => cataract(),
        PathType::DryEye => dry_eye(),
        PathType::ContactLens => contact_lens(),
    }
}

fn laser_eye() -> Vec<Question> {
    vec![
        Question::new(
            "laser_q2",
            "Do you currently wear glasses or contact lenses?",
            &[
                ("Yes, glasses", "glasses"),
                ("Yes, contact lenses", "contacts"),
                ("Yes, both", "both"),
                ("No", "no"),
            ],
        ),
        Question::new(
            "laser_q3",
            "What is your age range?",
            &[
                ("Under 21", "under_21"),
                ("21-40", "21_40"),
                ("41-60", "41_60"),
                ("Over 60", "over_60"),
            ],
        ),
        Question::new(
            "laser_q4",
            "Do you have any existing eye health issues?",
            &[
                ("Dry eyes", "dry_eyes"),
                ("Glaucoma", "glaucoma"),
                ("Cataracts", "cataracts"),
                ("None that I know of", "none"),
            ],
        ),
        Question::new(
            "laser_q5",
            "Have you had any previous eye surgery?",
            &[("Yes", "yes"), ("No", "no")],
        ),
        Question::new(
            "laser_q6",
            "Would you like to book a free consultation to discuss laser eye surgery?",
            &[
                ("Yes, definitely", "yes_definitely"),
                ("Yes, but I have more questions", "yes_questions"),
                ("Maybe later", "maybe_later"),
            ],
        ),
    ]
}

fn cataract() -> Vec<Question> {
    vec![
        Question::new(
            "cataract_q2",
            "Are you experiencing cloudy or blurred vision?",
            &[
                ("Yes, frequently", "frequently"),
                ("Sometimes", "sometimes"),
                ("Rarely", "rarely"),
                ("Not sure", "not_sure"),
            ],
        ),
        Question::new(
            "cataract_q3",
            "Have you been diagnosed with cataracts?",
            &[
                ("Yes", "yes"),
                ("No", "no"),
                ("Not yet, but I suspect I have them", "suspect"),
            ],
        ),
        Question::new(
            "cataract_q4",
            "Do you currently use reading glasses?",
            &[
                ("Yes, all the time", "always"),
                ("Yes, occasionally", "occasionally"),
                ("No", "no"),
            ],
        ),
        Question::new(
            "cataract_q5",
            "Are you interested in learning about lens replacement options?",
            &[
                ("Yes, very interested", "very_interested"),
                ("Somewhat interested", "somewhat"),
                ("Just exploring options", "exploring"),
            ],
        ),
        Question::new(
            "cataract_q6",
            "Would you like to book a consultation to discuss your vision?",
            &[
                ("Yes, as soon as possible", "yes_asap"),
                ("Yes, but not urgent", "yes_not_urgent"),
                ("I need more information first", "need_info"),
            ],
        ),
    ]
}

fn dry_eye() -> Vec<Question> {
    vec![
        Question::new(
            "dry_q2",
            "How often do your eyes feel irritated or dry?",
            &[
                ("Daily", "daily"),
                ("A few times a week", "weekly"),
                ("Occasionally", "occasionally"),
                ("Rarely", "rarely"),
            ],
        ),
        Question::new(
            "dry_q3",
            "Do you currently use eye drops?",
            &[
                ("Yes, daily", "yes_daily"),
                ("Yes, occasionally", "yes_occasionally"),
                ("No", "no"),
            ],
        ),
        Question::new(
            "dry_q4",
            "Do you spend long hours working on a computer or digital device?",
            &[
                ("Yes, more than 6 hours a day", "heavy_use"),
                ("Yes, 3-6 hours a day", "moderate_use"),
                ("Less than 3 hours a day", "light_use"),
            ],
        ),
        Question::new(
            "dry_q5",
            "Do you have any known allergies that affect your eyes?",
            &[("Yes", "yes"), ("No", "no"), ("Not sure", "not_sure")],
        ),
        Question::new(
            "dry_q6",
            "Would you like professional advice on treating dry eyes?",
            &[
                ("Yes, I need help", "yes_need_help"),
                ("Yes, interested in options", "yes_interested"),
                ("Just gathering information", "just_info"),
            ],
        ),
    ]
}

fn contact_lens() -> Vec<Question> {
    vec![
        Question::new(
            "contact_q2",
            "Are you currently wearing contact lenses?",
            &[
                ("Yes, regularly", "yes_regularly"),
                ("Yes, occasionally", "yes_occasionally"),
                ("No, but I used to", "used_to"),
                ("No, never tried them", "never"),
            ],
        ),
        Question::new(
            "contact_q3",
            "Do you find your current lenses uncomfortable?",
            &[
                ("Yes, often", "yes_often"),
                ("Sometimes", "sometimes"),
                ("No", "no"),
                ("Not applicable", "na"),
            ],
        ),
        Question::new(
            "contact_q4",
            "Are you interested in exploring new contact lens options?",
            &[
                ("Yes, definitely", "yes_definitely"),
                ("Maybe", "maybe"),
                ("Just curious", "curious"),
            ],
        ),
        Question::new(
            "contact_q5",
            "Do you experience dryness when wearing contact lenses?",
            &[
                ("Yes, frequently", "frequently"),
                ("Sometimes", "sometimes"),
                ("Rarely", "rarely"),
                ("Never/Not applicable", "never_na"),
            ],
        ),
        Question::new(
            "contact_q6",
            "Would you like to book a contact lens fitting consultation?",
            &[
                ("Yes, please", "yes_please"),
                ("Yes, but I have questions first", "yes_questions"),
                ("Not at this time", "not_now"),
            ],
        ),
    ]
}
