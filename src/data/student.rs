use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use std::{fmt, str::FromStr};

///Identifier assigned by the remote store. Kept opaque - the store may hand out strings or numbers.
///A record that comes back without one (or with `null`) gets the empty id, so the rest of the list still shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StudentId(String);

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StudentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StudentIdVisitor;

        impl Visitor<'_> for StudentIdVisitor {
            type Value = StudentId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer student id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(StudentId(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(StudentId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(StudentId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(StudentId(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(StudentId::default())
            }
        }

        deserializer.deserialize_any(StudentIdVisitor)
    }
}

///A student as it exists in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub id: StudentId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Student {
    pub fn draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            student_id: self.student_id.clone(),
            phone: self.phone.clone(),
        }
    }
}

///The four editable fields, without an id. This is exactly what gets sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub phone: String,
}

impl StudentDraft {
    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::StudentId => &self.student_id,
            StudentField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: StudentField, value: String) {
        let slot = match field {
            StudentField::Name => &mut self.name,
            StudentField::Email => &mut self.email,
            StudentField::StudentId => &mut self.student_id,
            StudentField::Phone => &mut self.phone,
        };
        *slot = value;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    StudentId,
    Phone,
}

impl StudentField {
    ///in the order the editor shows them
    pub const ALL: [Self; 4] = [Self::Name, Self::Phone, Self::Email, Self::StudentId];

    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::StudentId => "studentId",
            Self::Phone => "phone",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::StudentId => "Student ID",
            Self::Phone => "Phone",
        }
    }

    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Email => "email",
            _ => "text",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStudentField;

impl FromStr for StudentField {
    type Err = UnknownStudentField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.form_name() == s)
            .ok_or(UnknownStudentField)
    }
}
