use super::{Gender, Profile};

struct Seed {
    id: &'static str,
    name: &'static str,
    age: u32,
    gender: Gender,
    bio: &'static str,
    interests: &'static [&'static str],
    /// `[longitude, latitude]`, a few kilometers around central Nairobi
    lng_lat: [f64; 2],
    online: bool,
    moving: bool,
    image: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Emma",
        age: 28,
        gender: Gender::Female,
        bio: "Adventure seeker and coffee lover",
        interests: &["Hiking", "Photography", "Travel"],
        lng_lat: [36.8431, -1.2775],
        online: true,
        moving: false,
        image: "https://images.unsplash.com/photo-1524504388940-b1c1722653e1",
    },
    Seed {
        id: "2",
        name: "Alex",
        age: 32,
        gender: Gender::Male,
        bio: "Tech enthusiast and startup founder",
        interests: &["Coding", "Entrepreneurship", "Fitness"],
        lng_lat: [36.8012, -1.3120],
        online: false,
        moving: true,
        image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d",
    },
    Seed {
        id: "3",
        name: "Sophia",
        age: 26,
        gender: Gender::Female,
        bio: "Art curator with a passion for local culture",
        interests: &["Art", "Museums", "Cooking"],
        lng_lat: [36.8603, -1.3005],
        online: true,
        moving: false,
        image: "https://images.unsplash.com/photo-1494790108377-be9c29b29330",
    },
    Seed {
        id: "4",
        name: "Michael",
        age: 35,
        gender: Gender::Male,
        bio: "Environmental scientist and nature lover",
        interests: &["Conservation", "Cycling", "Sustainability"],
        lng_lat: [36.7854, -1.2689],
        online: false,
        moving: false,
        image: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e",
    },
    Seed {
        id: "5",
        name: "Olivia",
        age: 29,
        gender: Gender::Female,
        bio: "Marketing professional and fitness instructor",
        interests: &["Yoga", "Digital Marketing", "Wellness"],
        lng_lat: [36.8277, -1.2501],
        online: true,
        moving: true,
        image: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80",
    },
    Seed {
        id: "6",
        name: "David",
        age: 33,
        gender: Gender::Male,
        bio: "Lawyer with a love for music and travel",
        interests: &["Jazz", "International Law", "Hiking"],
        lng_lat: [36.8150, -1.3290],
        online: false,
        moving: false,
        image: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e",
    },
    Seed {
        id: "7",
        name: "Isabella",
        age: 27,
        gender: Gender::Female,
        bio: "Graphic designer and creative spirit",
        interests: &["Design", "Street Art", "Photography"],
        lng_lat: [36.8488, -1.2602],
        online: true,
        moving: false,
        image: "https://images.unsplash.com/photo-1517841905240-472988babdf9",
    },
    Seed {
        id: "8",
        name: "James",
        age: 30,
        gender: Gender::Male,
        bio: "Software engineer and tech innovator",
        interests: &["AI", "Robotics", "Gaming"],
        lng_lat: [36.7931, -1.2958],
        online: true,
        moving: false,
        image: "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d",
    },
    Seed {
        id: "9",
        name: "Ava",
        age: 25,
        gender: Gender::Female,
        bio: "Journalist and social media influencer",
        interests: &["Writing", "Social Media", "Podcasting"],
        lng_lat: [36.8366, -1.3182],
        online: false,
        moving: false,
        image: "https://images.unsplash.com/photo-1534528741775-53994a69daeb",
    },
    Seed {
        id: "10",
        name: "Christopher",
        age: 36,
        gender: Gender::Male,
        bio: "Chef and culinary explorer",
        interests: &["Cooking", "Food Photography", "Traveling"],
        lng_lat: [36.8069, -1.2453],
        online: false,
        moving: false,
        image: "https://images.unsplash.com/photo-1507591064344-4c6ce005b128",
    },
];

/// Built-in sample set used when no remote records are available
pub fn sample_profiles() -> Vec<Profile> {
    SEEDS
        .iter()
        .map(|seed| {
            let mut profile = Profile::new(seed.id, seed.name)
                .with_coordinates(seed.lng_lat[0], seed.lng_lat[1])
                .with_image(seed.image)
                .with_online(seed.online)
                .with_age(seed.age)
                .with_gender(seed.gender);
            profile.is_moving = seed.moving;
            profile.bio = Some(seed.bio.to_string());
            profile.interests = seed.interests.iter().map(|s| s.to_string()).collect();
            profile.location = Some("Nairobi".to_string());
            profile
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CoordinatePolicy;
    use crate::core::validate::{sanitize_with_outcome, Sanitized};

    #[test]
    fn test_samples_are_clean() {
        let policy = CoordinatePolicy::default();
        let profiles = sample_profiles();
        assert_eq!(profiles.len(), 10);
        for profile in &profiles {
            let (_, outcome) = sanitize_with_outcome(profile.raw_coordinates(), &policy);
            assert_eq!(outcome, Sanitized::Valid, "{} needs repair", profile.id);
        }
        assert!(profiles.iter().any(|p| p.is_moving));
    }
}
