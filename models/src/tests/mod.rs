mod new_user;
mod object_key;
mod translate;
