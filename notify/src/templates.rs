//! Member-facing message bodies.

use common::env_config::GymConfig;
use html_escape::encode_text;
use db::models::bmi::BmiRecordWithMember;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn email_subject(gym: &GymConfig, is_new_customer: bool) -> String {
    if is_new_customer {
        format!("🎉 Your Fitness Report Is Ready - Welcome to {}!", gym.name)
    } else {
        "🎉 Your Updated Fitness Report Is Ready".to_string()
    }
}

pub fn whatsapp_message(record: &BmiRecordWithMember, gym: &GymConfig, is_new_customer: bool) -> String {
    let r = &record.record;
    let advice = bmi::advice_for(&r.category);

    if is_new_customer {
        format!(
            "🎉 *Welcome to {gym}!*\n\
             \n\
             Hi {name},\n\
             \n\
             Your first BMI assessment is complete:\n\
             📊 *BMI: {bmi}*\n\
             📈 Category: {category}\n\
             ⚖️ Weight: {weight} kg\n\
             📏 Height: {height} cm\n\
             \n\
             🎁 *New Member Special Offers:*\n\
             - Free Diet Plan (Worth ₹3,500)\n\
             - Personal Training Session\n\
             - Complete Gym Tour with Expert\n\
             \n\
             {advice}\n\
             \n\
             📞 Call/WhatsApp: {contact}\n\
             📍 Visit: {address}\n\
             \n\
             Welcome to your fitness journey! 💪",
            gym = gym.name,
            name = record.member.name,
            bmi = r.bmi,
            category = r.category,
            weight = r.weight,
            height = r.height,
            advice = advice,
            contact = gym.contact,
            address = gym.address,
        )
    } else {
        format!(
            "🏋️ *BMI Update Ready!*\n\
             \n\
             Hi {name},\n\
             \n\
             Your latest assessment shows:\n\
             📊 *Current BMI: {bmi}*\n\
             📈 Category: {category}\n\
             ⚖️ Weight: {weight} kg\n\
             📏 Height: {height} cm\n\
             📅 Recorded: {date}\n\
             \n\
             {advice}\n\
             \n\
             Keep up the great work! 💪\n\
             \n\
             Contact: {contact}\n\
             Visit: {address}",
            name = record.member.name,
            bmi = r.bmi,
            category = r.category,
            weight = r.weight,
            height = r.height,
            date = r.recorded_at.format(DATE_FORMAT),
            advice = advice,
            contact = gym.contact,
            address = gym.address,
        )
    }
}

pub fn email_html(record: &BmiRecordWithMember, gym: &GymConfig, is_new_customer: bool) -> String {
    let r = &record.record;
    let (intro, heading) = if is_new_customer {
        (
            "Your fitness journey begins now!".to_string(),
            "Your First BMI Assessment:",
        )
    } else {
        (
            format!(
                "Hi {}, here is your latest BMI assessment:",
                encode_text(&record.member.name)
            ),
            "Your BMI Assessment:",
        )
    };

    let welcome_bonus = if is_new_customer {
        r#"
          <div style="background: linear-gradient(135deg, #fff3cd, #ffeaa7); padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #f39c12;">
            <h3 style="color: #856404; margin-bottom: 15px;">🎁 Welcome Bonus - FREE Worth ₹3,500!</h3>
            <ul style="color: #856404;">
              <li>✅ Personalized Diet Plan</li>
              <li>✅ One-on-One Training Session</li>
              <li>✅ Complete Gym Tour with Expert</li>
            </ul>
            <p style="color: #d63384; font-weight: bold; margin-top: 15px;">⏰ Claim within 3 days of joining!</p>
          </div>"#
    } else {
        ""
    };

    format!(
        r#"
      <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background-color: #f9f9f9; padding: 20px;">
        <div style="background-color: white; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1);">
          <h1 style="color: #2563eb; text-align: center; margin-bottom: 10px;">🎉 Your Fitness Report Is Ready</h1>
          <p style="text-align: center; color: #666; margin-bottom: 30px;">{intro}</p>
          <div style="background: linear-gradient(135deg, #e8f5e8, #d4edda); padding: 20px; border-radius: 8px; margin: 20px 0;">
            <h3 style="color: #155724; margin-bottom: 15px;">{heading}</h3>
            <ul style="list-style: none; padding: 0;">
              <li style="padding: 5px 0;"><strong>BMI:</strong> {bmi}</li>
              <li style="padding: 5px 0;"><strong>Category:</strong> {category}</li>
              <li style="padding: 5px 0;"><strong>Weight:</strong> {weight} kg</li>
              <li style="padding: 5px 0;"><strong>Height:</strong> {height} cm</li>
              <li style="padding: 5px 0;"><strong>Date:</strong> {date}</li>
            </ul>
          </div>{welcome_bonus}
          <div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 2px solid #eee;">
            <p style="color: #666;">📞 Call/WhatsApp: <strong>{contact}</strong></p>
            <p style="color: #666;">📍 Visit: <strong>{address}</strong></p>
            <p style="color: #666;">Your detailed health report is attached as PDF.</p>
          </div>
        </div>
      </div>
    "#,
        intro = intro,
        heading = heading,
        bmi = r.bmi,
        category = encode_text(&r.category),
        weight = r.weight,
        height = r.height,
        date = r.recorded_at.format(DATE_FORMAT),
        welcome_bonus = welcome_bonus,
        contact = encode_text(&gym.contact),
        address = encode_text(&gym.address),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;
    use db::models::{bmi::BmiRecord, member::Member};

    use super::*;

    pub fn gym() -> GymConfig {
        GymConfig {
            name: "Iron Temple".to_string(),
            contact: "+91 99999 00000".to_string(),
            address: "12 Main Road".to_string(),
            map_url: "https://g.co/kgs/mQtKEQ".to_string(),
            logo_path: "public/logo.png".to_string(),
        }
    }

    pub fn record(customer_type: &str, phone: &str, email: Option<&str>) -> BmiRecordWithMember {
        let at = NaiveDate::from_ymd_opt(2025, 3, 9)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        BmiRecordWithMember {
            record: BmiRecord {
                id: 11,
                member_id: 4,
                height: 160.0,
                weight: 55.0,
                bmi: 21.5,
                category: "Normal Weight".to_string(),
                age: Some(29.0),
                ideal_body_weight: None,
                total_fat_percentage: Some(18.5),
                subcutaneous_fat: None,
                visceral_fat: Some(4.0),
                muscle_mass: None,
                resting_metabolism: None,
                biological_age: None,
                health_conclusion: None,
                attended_by: None,
                recorded_at: at,
            },
            member: Member {
                id: 4,
                member_id: "M004".to_string(),
                name: "Jane <Doe>".to_string(),
                phone: phone.to_string(),
                email: email.map(str::to_string),
                date_of_birth: None,
                relationship_status: None,
                service_looking: None,
                platform: None,
                customer_type: customer_type.to_string(),
                created_at: at,
                updated_at: at,
            },
        }
    }

    #[test]
    fn subjects_differ_by_customer_type() {
        assert_eq!(
            email_subject(&gym(), true),
            "🎉 Your Fitness Report Is Ready - Welcome to Iron Temple!"
        );
        assert_eq!(email_subject(&gym(), false), "🎉 Your Updated Fitness Report Is Ready");
    }

    #[test]
    fn whatsapp_new_member_includes_offers_and_advice() {
        let message = whatsapp_message(&record("new", "999", None), &gym(), true);
        assert!(message.starts_with("🎉 *Welcome to Iron Temple!*\n\nHi Jane <Doe>,"));
        assert!(message.contains("📊 *BMI: 21.5*"));
        assert!(message.contains("⚖️ Weight: 55 kg"));
        assert!(message.contains("- Free Diet Plan (Worth ₹3,500)"));
        assert!(message.contains("✅ Great job!"));
    }

    #[test]
    fn whatsapp_returning_member_shows_recorded_date() {
        let message = whatsapp_message(&record("existing", "999", None), &gym(), false);
        assert!(message.starts_with("🏋️ *BMI Update Ready!*"));
        assert!(message.contains("📅 Recorded: 09/03/2025"));
        assert!(message.ends_with("Visit: 12 Main Road"));
    }

    #[test]
    fn email_escapes_member_text() {
        let html = email_html(&record("existing", "999", None), &gym(), false);
        assert!(html.contains("Hi Jane &lt;Doe&gt;, here is your latest BMI assessment:"));
        assert!(!html.contains("Welcome Bonus"));

        let html = email_html(&record("new", "999", None), &gym(), true);
        assert!(html.contains("Welcome Bonus - FREE Worth ₹3,500!"));
        assert!(html.contains("<strong>Date:</strong> 09/03/2025"));
    }

    #[test]
    fn gym_details_are_escaped() {
        let mut gym = gym();
        gym.contact = "Sales & Support <desk>".to_string();
        let html = email_html(&record("new", "999", None), &gym, true);
        assert!(html.contains("Sales &amp; Support &lt;desk&gt;"));
    }
}
